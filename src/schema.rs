// 📐 Schema Mapper - arbitrary sheet columns → canonical template columns
// Direct name pass-through first, then the alias table (aliases always win).

use crate::attributes::{CanonicalField, DEFINITIONS};
use crate::error::{ConfigError, SchemaError};
use crate::record::{CanonicalRecord, Cell, InputBatch, InputRecord};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;

// ============================================================================
// COLUMN NAMES
// ============================================================================

/// Trim, drop a trailing run of `*` markers, trim again.
///
/// `"Invoice Number* "` → `"Invoice Number"`, `"Item Taxable Value *"` → `"Item Taxable Value"`
pub fn normalize_column_name(name: &str) -> String {
    name.trim().trim_end_matches('*').trim().to_string()
}

fn field_by_name(name: &str) -> Option<CanonicalField> {
    DEFINITIONS.iter().find(|d| d.name == name).map(|d| d.field)
}

// ============================================================================
// ALIAS TABLE
// ============================================================================

/// Column names seen in common billing exports.
const STANDARD_ALIASES: [(&str, CanonicalField); 14] = [
    ("My GSTIN", CanonicalField::TaxPayerGstin),
    ("Customer Billing GSTIN", CanonicalField::CounterPartyGstin),
    ("Invoice Date", CanonicalField::InvoiceDate),
    ("Invoice Number", CanonicalField::InvoiceNumber),
    ("Customer Billing Name", CanonicalField::CounterPartyName),
    ("HSN or SAC code", CanonicalField::HsnSac),
    ("Item desciption", CanonicalField::ItemDescription),
    ("Item Taxable Value *", CanonicalField::TaxableValue),
    ("Total Transaction Value", CanonicalField::InvoiceValue),
    ("CGST Amount", CanonicalField::CgstAmount),
    ("SGST Amount", CanonicalField::SgstAmount),
    ("IGST Amount", CanonicalField::IgstAmount),
    ("Item quantity", CanonicalField::Quantity),
    ("Item Unit of Measurement", CanonicalField::Unit),
];

/// Ordered source-column → canonical-field table. Keys are stored normalized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AliasTable {
    entries: IndexMap<String, CanonicalField>,
}

impl AliasTable {
    pub fn empty() -> Self {
        AliasTable::default()
    }

    pub fn standard() -> Self {
        let mut table = AliasTable::empty();
        for (source, target) in STANDARD_ALIASES {
            table.insert(source, target);
        }
        table
    }

    /// Parse a JSON object `{"source column": "canonical name or header"}`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::parse_json(json, "<inline>")
    }

    /// Load an alias table from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::AliasFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse_json(&content, &path.display().to_string())
    }

    fn parse_json(json: &str, label: &str) -> Result<Self, ConfigError> {
        let raw: IndexMap<String, String> =
            serde_json::from_str(json).map_err(|e| ConfigError::AliasFile {
                path: label.to_string(),
                message: e.to_string(),
            })?;
        Self::from_entries(raw)
    }

    /// Build from `(source column, canonical name or header)` pairs.
    pub fn from_entries<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = AliasTable::empty();
        for (source, target) in entries {
            let field = CanonicalField::lookup(target.trim()).ok_or_else(|| {
                ConfigError::UnknownAliasTarget {
                    source_column: source.clone(),
                    target: target.clone(),
                }
            })?;
            table.insert(&source, field);
        }
        Ok(table)
    }

    /// Add or replace an alias. Replacing keeps the original position.
    pub fn insert(&mut self, source: &str, target: CanonicalField) {
        self.entries.insert(normalize_column_name(source), target);
    }

    /// Merge another table on top of this one (its entries win).
    pub fn extend(&mut self, other: &AliasTable) {
        for (source, target) in other.iter() {
            self.insert(source, target);
        }
    }

    pub fn get(&self, source: &str) -> Option<CanonicalField> {
        self.entries.get(&normalize_column_name(source)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CanonicalField)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// COLUMN PLAN
// ============================================================================

/// Which input column feeds which canonical field, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    /// (input header, target field); later entries overwrite earlier ones
    assignments: Vec<(String, CanonicalField)>,
    /// Input header whose value ends up in `Invoice Number`
    invoice_source: String,
}

impl ColumnPlan {
    pub fn assignments(&self) -> &[(String, CanonicalField)] {
        &self.assignments
    }

    pub fn invoice_source(&self) -> &str {
        &self.invoice_source
    }

    /// Input header that ends up feeding `field`, if any.
    pub fn source_for(&self, field: CanonicalField) -> Option<&str> {
        self.assignments
            .iter()
            .rev()
            .find(|(_, f)| *f == field)
            .map(|(h, _)| h.as_str())
    }
}

// ============================================================================
// EXCLUSION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExclusionReason {
    /// Every cell in the row is empty
    EmptyRow,
    /// No invoice number
    MissingInvoiceNumber,
    /// Invoice number reads "total" - a subtotal/footer row
    TotalRow,
}

fn exclusion_reason(record: &InputRecord, invoice_source: &str) -> Option<ExclusionReason> {
    if record.values().all(Cell::is_null) {
        return Some(ExclusionReason::EmptyRow);
    }

    match record.get(invoice_source).and_then(Cell::as_text) {
        None => Some(ExclusionReason::MissingInvoiceNumber),
        Some(text) if text.trim().to_lowercase() == "total" => Some(ExclusionReason::TotalRow),
        Some(_) => None,
    }
}

// ============================================================================
// SCHEMA MAPPER
// ============================================================================

/// Output of the mapping stage.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedBatch {
    /// Surviving rows, original relative order
    pub records: Vec<CanonicalRecord>,
    /// (input row index, reason) for every dropped row
    pub excluded: Vec<(usize, ExclusionReason)>,
}

pub struct SchemaMapper<'a> {
    aliases: &'a AliasTable,
}

impl<'a> SchemaMapper<'a> {
    pub fn new(aliases: &'a AliasTable) -> Self {
        SchemaMapper { aliases }
    }

    /// Work out the column assignments for a header row.
    ///
    /// Fails when no column would populate `Invoice Number`.
    pub fn plan(&self, headers: &[String]) -> Result<ColumnPlan, SchemaError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_column_name(h)).collect();
        let mut assignments = Vec::new();

        // Pass 1: columns already named like a template column
        for (header, name) in headers.iter().zip(&normalized) {
            if let Some(field) = field_by_name(name) {
                assignments.push((header.clone(), field));
            }
        }

        // Pass 2: explicit aliases, applied after (and over) direct matches
        for (source, target) in self.aliases.iter() {
            if let Some(pos) = normalized.iter().rposition(|n| n == source) {
                assignments.push((headers[pos].clone(), target));
            }
        }

        let invoice_source = assignments
            .iter()
            .rev()
            .find(|(_, f)| *f == CanonicalField::InvoiceNumber)
            .map(|(h, _)| h.clone())
            .ok_or_else(|| SchemaError::MissingInvoiceNumberColumn {
                headers: headers.to_vec(),
            })?;

        tracing::debug!(
            columns = headers.len(),
            mapped = assignments.len(),
            invoice_source = %invoice_source,
            "column plan built"
        );

        Ok(ColumnPlan {
            assignments,
            invoice_source,
        })
    }

    /// Filter footer/empty rows and map the rest onto canonical records.
    pub fn map(&self, batch: &InputBatch) -> Result<MappedBatch, SchemaError> {
        let plan = self.plan(&batch.headers)?;

        let mut records = Vec::with_capacity(batch.len());
        let mut excluded = Vec::new();

        for (row, input) in batch.records.iter().enumerate() {
            if let Some(reason) = exclusion_reason(input, plan.invoice_source()) {
                excluded.push((row, reason));
                continue;
            }
            records.push(Self::map_row(&plan, row, input));
        }

        Ok(MappedBatch { records, excluded })
    }

    fn map_row(plan: &ColumnPlan, row: usize, input: &InputRecord) -> CanonicalRecord {
        let mut record = CanonicalRecord::new(row);
        for (header, field) in plan.assignments() {
            let value = input.get(header).cloned().unwrap_or_default();
            record.set(*field, value);
        }
        record
    }
}

// ============================================================================
// TESTS
// ============================================================================
