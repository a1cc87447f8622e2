// 📦 Records - raw input rows and canonical output rows
// A Cell is a tagged scalar. Null ("never set") and Blank ("a rule cleared it")
// are different states and must stay different all the way to the output.

use crate::attributes::{CanonicalField, FIELD_COUNT};
use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::str::FromStr;

// ============================================================================
// CELL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Never set - not applicable to any rule
    #[default]
    Null,
    /// Explicitly cleared by a rule (renders as "")
    Blank,
    Text(String),
    Number(Decimal),
    Integer(i64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Cell from a raw CSV field: empty/whitespace-only becomes Null,
    /// everything else stays text. Numeric coercion happens per stage.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Null
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Cell from a JSON scalar (HTTP intake). Strings follow the same
    /// empty → Null rule as CSV fields.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Cell::Null,
            Value::String(s) => Cell::from_raw(s),
            Value::Bool(b) => Cell::Text(b.to_string()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Cell::Integer(i)
                } else {
                    parse_decimal(&n.to_string())
                        .map(Cell::Number)
                        .unwrap_or_else(|| Cell::Text(n.to_string()))
                }
            }
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }

    /// Null, Blank, or text that is empty after trimming.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null | Cell::Blank => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Integer(_) => false,
        }
    }

    /// Textual view used by prefix/equality rules. Null has none.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => None,
            Cell::Blank => Some(Cow::Borrowed("")),
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(d) => Some(Cow::Owned(d.normalize().to_string())),
            Cell::Integer(i) => Some(Cow::Owned(i.to_string())),
        }
    }

    /// Numeric view. Unparseable text, Null and Blank have none.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Number(d) => Some(*d),
            Cell::Integer(i) => Some(Decimal::from(*i)),
            Cell::Text(s) => parse_decimal(s),
            Cell::Null | Cell::Blank => None,
        }
    }

    /// How the cell is written to a CSV field.
    pub fn render(&self) -> String {
        match self {
            Cell::Null | Cell::Blank => String::new(),
            other => other.as_text().map(Cow::into_owned).unwrap_or_default(),
        }
    }
}

/// Values with fewer significant digits than this survive an f64 round trip.
const F64_EXACT_MANTISSA: u128 = 1_000_000_000_000_000;

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Blank => serializer.serialize_str(""),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Integer(i) => serializer.serialize_i64(*i),
            Cell::Number(d) => {
                let d = d.normalize();
                match d.to_f64() {
                    Some(f) if d.mantissa().unsigned_abs() < F64_EXACT_MANTISSA => {
                        serializer.serialize_f64(f)
                    }
                    // Too many digits for a JSON number to carry exactly
                    _ => serializer.serialize_str(&d.to_string()),
                }
            }
        }
    }
}

/// Lenient decimal parsing: plain or scientific notation, surrounding
/// whitespace ignored. Anything else is `None`.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

// ============================================================================
// INPUT
// ============================================================================

/// One raw row: source column name -> value. Missing columns read as Null.
pub type InputRecord = IndexMap<String, Cell>;

/// A parsed sheet: its header row plus every data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputBatch {
    pub headers: Vec<String>,
    pub records: Vec<InputRecord>,
}

impl InputBatch {
    pub fn new(headers: Vec<String>) -> Self {
        InputBatch {
            headers,
            records: Vec::new(),
        }
    }

    /// Build a batch from keyed rows; headers are the union of keys in
    /// first-seen order.
    pub fn from_records(records: Vec<InputRecord>) -> Self {
        let mut headers: IndexMap<String, ()> = IndexMap::new();
        for record in &records {
            for key in record.keys() {
                headers.entry(key.clone()).or_insert(());
            }
        }
        InputBatch {
            headers: headers.into_keys().collect(),
            records,
        }
    }

    /// Append a positional row. Short rows are padded with Null, extra
    /// values beyond the header are dropped.
    pub fn push_row(&mut self, values: Vec<Cell>) {
        let mut values = values.into_iter();
        let record = self
            .headers
            .iter()
            .map(|h| (h.clone(), values.next().unwrap_or_default()))
            .collect();
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// CANONICAL RECORD
// ============================================================================

/// One output row with every template column.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    cells: Vec<Cell>,
    /// Index of the input row this record came from (0-based)
    source_row: usize,
    /// This line's own share of the invoice total, captured on first
    /// aggregation so that re-aggregating never double counts.
    pub(crate) line_contribution: Option<Decimal>,
}

impl CanonicalRecord {
    pub fn new(source_row: usize) -> Self {
        CanonicalRecord {
            cells: vec![Cell::Null; FIELD_COUNT],
            source_row,
            line_contribution: None,
        }
    }

    pub fn source_row(&self) -> usize {
        self.source_row
    }

    pub fn get(&self, field: CanonicalField) -> &Cell {
        &self.cells[field.index()]
    }

    pub fn set(&mut self, field: CanonicalField, value: Cell) {
        self.cells[field.index()] = value;
    }

    /// Builder: set a field
    pub fn with(mut self, field: CanonicalField, value: Cell) -> Self {
        self.set(field, value);
        self
    }

    pub fn text(&self, field: CanonicalField) -> Option<Cow<'_, str>> {
        self.get(field).as_text()
    }

    /// Case-sensitive exact comparison of a field's text.
    pub fn text_eq(&self, field: CanonicalField, expected: &str) -> bool {
        self.text(field).as_deref() == Some(expected)
    }

    /// Grouping key: the invoice number as text, None when null.
    pub fn invoice_key(&self) -> Option<String> {
        self.text(CanonicalField::InvoiceNumber).map(Cow::into_owned)
    }

    /// Cells in canonical column order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// (field, cell) pairs in canonical column order
    pub fn fields(&self) -> impl Iterator<Item = (CanonicalField, &Cell)> {
        CanonicalField::all().zip(self.cells.iter())
    }

    /// Header -> value map, for JSON output.
    pub fn to_map(&self) -> IndexMap<&'static str, Cell> {
        self.fields()
            .map(|(field, cell)| (field.header(), cell.clone()))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw() {
        assert_eq!(Cell::from_raw(""), Cell::Null);
        assert_eq!(Cell::from_raw("   "), Cell::Null);
        assert_eq!(Cell::from_raw("0401"), Cell::text("0401"));
        assert_eq!(Cell::from_raw(" INV1 "), Cell::text(" INV1 "));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Cell::from_json(&json!(null)), Cell::Null);
        assert_eq!(Cell::from_json(&json!("27AAA")), Cell::text("27AAA"));
        assert_eq!(Cell::from_json(&json!(90)), Cell::Integer(90));
        assert_eq!(
            Cell::from_json(&json!(90.5)),
            Cell::Number(Decimal::from_str("90.5").unwrap())
        );
        assert_eq!(Cell::from_json(&json!(true)), Cell::text("true"));
        assert_eq!(Cell::from_json(&json!("")), Cell::Null);
        assert_eq!(Cell::from_json(&json!("   ")), Cell::Null);
    }

    #[test]
    fn test_null_and_blank_are_distinct() {
        assert_ne!(Cell::Null, Cell::Blank);
        assert!(Cell::Null.is_missing());
        assert!(Cell::Blank.is_missing());
        assert_eq!(Cell::Null.as_text(), None);
        assert_eq!(Cell::Blank.as_text().as_deref(), Some(""));
        assert_eq!(Cell::Null.render(), "");
        assert_eq!(Cell::Blank.render(), "");
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Cell::text(" 90.50 ").to_decimal(), Some(Decimal::new(905, 1)));
        assert_eq!(Cell::text("1e3").to_decimal(), Some(Decimal::from(1000)));
        assert_eq!(Cell::text("N/A").to_decimal(), None);
        assert_eq!(Cell::Integer(7).to_decimal(), Some(Decimal::from(7)));
        assert_eq!(Cell::Blank.to_decimal(), None);
    }

    #[test]
    fn test_number_text_is_normalized() {
        let cell = Cell::Number(Decimal::from_str("998877.00").unwrap());
        assert_eq!(cell.as_text().as_deref(), Some("998877"));
        assert_eq!(cell.render(), "998877");
    }

    #[test]
    fn test_serialize_cells() {
        let values = vec![
            Cell::Null,
            Cell::Blank,
            Cell::text("EXP"),
            Cell::Integer(1),
            Cell::Number(Decimal::new(14005, 1)),
        ];
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json, json!([null, "", "EXP", 1, 1400.5]));
    }

    #[test]
    fn test_serialize_wide_numbers_exactly() {
        let max = Cell::Number(Decimal::MAX);
        assert_eq!(
            serde_json::to_value(&max).unwrap(),
            json!("79228162514264337593543950335")
        );

        let precise = Cell::Number(Decimal::from_str("1234567890123456.78").unwrap());
        assert_eq!(serde_json::to_value(&precise).unwrap(), json!("1234567890123456.78"));

        let plain = Cell::Number(Decimal::from_str("123456789012.50").unwrap());
        assert_eq!(serde_json::to_value(&plain).unwrap(), json!(123456789012.5));
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut batch = InputBatch::new(vec!["A".to_string(), "B".to_string()]);
        batch.push_row(vec![Cell::text("x")]);
        batch.push_row(vec![Cell::text("1"), Cell::text("2"), Cell::text("3")]);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0]["B"], Cell::Null);
        assert_eq!(batch.records[1].len(), 2);
    }

    #[test]
    fn test_from_records_collects_headers_in_order() {
        let mut first = InputRecord::new();
        first.insert("Invoice Number".to_string(), Cell::text("INV1"));
        let mut second = InputRecord::new();
        second.insert("IGST Amount".to_string(), Cell::Integer(5));
        second.insert("Invoice Number".to_string(), Cell::text("INV2"));

        let batch = InputBatch::from_records(vec![first, second]);
        assert_eq!(batch.headers, vec!["Invoice Number", "IGST Amount"]);
    }

    #[test]
    fn test_canonical_record_defaults_to_null() {
        let record = CanonicalRecord::new(3);
        assert_eq!(record.source_row(), 3);
        assert_eq!(record.cells().len(), FIELD_COUNT);
        assert!(record.cells().iter().all(Cell::is_null));
        assert_eq!(record.invoice_key(), None);
    }

    #[test]
    fn test_canonical_record_text_eq() {
        let record = CanonicalRecord::new(0)
            .with(CanonicalField::InvoiceType, Cell::text("EXP"))
            .with(CanonicalField::InvoiceNumber, Cell::Integer(42));

        assert!(record.text_eq(CanonicalField::InvoiceType, "EXP"));
        assert!(!record.text_eq(CanonicalField::InvoiceType, "exp"));
        assert_eq!(record.invoice_key(), Some("42".to_string()));

        let map = record.to_map();
        assert_eq!(map["Invoice Type*"], Cell::text("EXP"));
        assert_eq!(map.keys().next(), Some(&"GSTIN of the Tax Payer*"));
    }
}
