// 🧮 Invoice Aggregator - per-invoice totals pushed back onto every line
// Invoice Value := Σ (line value + IGST + CGST + SGST) over the invoice group.
// CESS is not part of the invoice value.

use crate::attributes::CanonicalField;
use crate::record::{parse_decimal, CanonicalRecord, Cell};
use crate::report::{CoercionWarning, Stage};
use rust_decimal::Decimal;
use std::collections::HashMap;

const TAX_COMPONENTS: [CanonicalField; 3] = [
    CanonicalField::IgstAmount,
    CanonicalField::CgstAmount,
    CanonicalField::SgstAmount,
];

const SUMMED_FIELDS: [CanonicalField; 4] = [
    CanonicalField::InvoiceValue,
    CanonicalField::IgstAmount,
    CanonicalField::CgstAmount,
    CanonicalField::SgstAmount,
];

/// Turn a text cell into a number in place. Unparseable text becomes Null
/// and yields a warning; whitespace becomes Null silently.
fn coerce_numeric(record: &mut CanonicalRecord, field: CanonicalField) -> Option<CoercionWarning> {
    let raw = match record.get(field) {
        Cell::Text(raw) => raw.clone(),
        _ => return None,
    };

    match parse_decimal(&raw) {
        Some(value) => {
            record.set(field, Cell::Number(value));
            None
        }
        None => {
            record.set(field, Cell::Null);
            if raw.trim().is_empty() {
                None
            } else {
                Some(CoercionWarning::new(record, field, &raw, Stage::Aggregation))
            }
        }
    }
}

/// This line's own contribution; null or non-numeric parts count as zero.
/// A part that would overflow the running sum is dropped with a warning.
fn line_total(record: &CanonicalRecord, warnings: &mut Vec<CoercionWarning>) -> Decimal {
    let mut total = Decimal::ZERO;
    for field in SUMMED_FIELDS {
        let Some(value) = record.get(field).to_decimal() else {
            continue;
        };
        match total.checked_add(value) {
            Some(sum) => total = sum,
            None => warnings.push(CoercionWarning::new(
                record,
                field,
                &value.to_string(),
                Stage::Aggregation,
            )),
        }
    }
    total
}

pub struct InvoiceAggregator;

impl InvoiceAggregator {
    /// Recompute `Invoice Value` for every invoice group.
    ///
    /// Each record's contribution is captured the first time it passes
    /// through here, so running the aggregator again changes nothing.
    pub fn aggregate(records: &mut [CanonicalRecord]) -> Vec<CoercionWarning> {
        let mut warnings = Vec::new();

        for record in records.iter_mut() {
            for field in SUMMED_FIELDS {
                warnings.extend(coerce_numeric(record, field));
            }
        }

        // Null invoice numbers share the `None` group
        let mut totals: HashMap<Option<String>, Decimal> = HashMap::new();
        for record in records.iter_mut() {
            let contribution = match record.line_contribution {
                Some(c) => c,
                None => line_total(record, &mut warnings),
            };

            let total = totals.entry(record.invoice_key()).or_insert(Decimal::ZERO);
            match total.checked_add(contribution) {
                Some(sum) => {
                    *total = sum;
                    record.line_contribution = Some(contribution);
                }
                None => {
                    // Line dropped from the invoice total; pinned to zero so a
                    // second pass agrees with the first.
                    record.line_contribution = Some(Decimal::ZERO);
                    warnings.push(CoercionWarning::new(
                        record,
                        CanonicalField::InvoiceValue,
                        &contribution.to_string(),
                        Stage::Aggregation,
                    ));
                }
            }
        }

        for record in records.iter_mut() {
            let total = totals
                .get(&record.invoice_key())
                .copied()
                .unwrap_or_default();
            record.set(CanonicalField::InvoiceValue, Cell::Number(total));

            for field in TAX_COMPONENTS {
                if record.get(field).is_null() {
                    record.set(field, Cell::Blank);
                }
            }
        }

        tracing::debug!(
            records = records.len(),
            invoices = totals.len(),
            warnings = warnings.len(),
            "invoice totals aggregated"
        );

        warnings
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn line(invoice: &str, value: &str, igst: &str, cgst: &str, sgst: &str) -> CanonicalRecord {
        CanonicalRecord::new(0)
            .with(CanonicalField::InvoiceNumber, Cell::text(invoice))
            .with(CanonicalField::InvoiceValue, Cell::from_raw(value))
            .with(CanonicalField::IgstAmount, Cell::from_raw(igst))
            .with(CanonicalField::CgstAmount, Cell::from_raw(cgst))
            .with(CanonicalField::SgstAmount, Cell::from_raw(sgst))
    }

    fn dec(s: &str) -> Cell {
        Cell::Number(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_group_total_on_every_line() {
        let mut records = vec![
            line("INV1", "1000", "0", "90", "90"),
            line("INV1", "200", "0", "10", "10"),
            line("INV2", "50", "9", "", ""),
        ];
        let warnings = InvoiceAggregator::aggregate(&mut records);

        assert!(warnings.is_empty());
        assert_eq!(records[0].get(CanonicalField::InvoiceValue), &dec("1400"));
        assert_eq!(records[1].get(CanonicalField::InvoiceValue), &dec("1400"));
        assert_eq!(records[2].get(CanonicalField::InvoiceValue), &dec("59"));
    }

    #[test]
    fn test_cess_excluded() {
        let mut records = vec![line("INV1", "100", "18", "", "")
            .with(CanonicalField::CessAmount, Cell::text("5"))];
        InvoiceAggregator::aggregate(&mut records);

        assert_eq!(records[0].get(CanonicalField::InvoiceValue), &dec("118"));
        assert_eq!(records[0].get(CanonicalField::CessAmount), &Cell::text("5"));
    }

    #[test]
    fn test_null_taxes_become_blank() {
        let mut records = vec![line("INV1", "500", "", "", "")];
        InvoiceAggregator::aggregate(&mut records);

        assert_eq!(records[0].get(CanonicalField::InvoiceValue), &dec("500"));
        for field in TAX_COMPONENTS {
            assert_eq!(records[0].get(field), &Cell::Blank);
        }
    }

    #[test]
    fn test_zero_tax_stays_zero() {
        let mut records = vec![line("INV1", "100", "0", "9", "9")];
        InvoiceAggregator::aggregate(&mut records);

        assert_eq!(records[0].get(CanonicalField::IgstAmount), &dec("0"));
        assert_eq!(records[0].get(CanonicalField::CgstAmount), &dec("9"));
    }

    #[test]
    fn test_unparseable_values_count_as_zero() {
        let mut records = vec![
            line("INV1", "100", "abc", "9", "9"),
            line("INV1", "n/a", "", "1", "1"),
        ];
        let warnings = InvoiceAggregator::aggregate(&mut records);

        assert_eq!(records[0].get(CanonicalField::InvoiceValue), &dec("120"));
        assert_eq!(records[0].get(CanonicalField::IgstAmount), &Cell::Blank);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].column, "IGST Amount*");
        assert_eq!(warnings[0].value, "abc");
        assert_eq!(warnings[1].column, "Invoice Value*");
        assert_eq!(warnings[1].stage, Stage::Aggregation);
    }

    #[test]
    fn test_missing_invoice_value_uses_taxes_only() {
        let mut records = vec![line("INV1", "", "", "45", "45")];
        InvoiceAggregator::aggregate(&mut records);
        assert_eq!(records[0].get(CanonicalField::InvoiceValue), &dec("90"));
    }

    #[test]
    fn test_null_invoice_number_is_its_own_group() {
        let mut records = vec![
            CanonicalRecord::new(0).with(CanonicalField::InvoiceValue, Cell::Integer(10)),
            CanonicalRecord::new(1).with(CanonicalField::InvoiceValue, Cell::Integer(5)),
            line("INV1", "7", "", "", ""),
        ];
        InvoiceAggregator::aggregate(&mut records);

        assert_eq!(records[0].get(CanonicalField::InvoiceValue), &dec("15"));
        assert_eq!(records[1].get(CanonicalField::InvoiceValue), &dec("15"));
        assert_eq!(records[2].get(CanonicalField::InvoiceValue), &dec("7"));
    }

    #[test]
    fn test_overflowing_part_is_dropped_with_warning() {
        let max = Decimal::MAX.to_string();
        let mut records = vec![line("INV1", &max, "1", "", "")];
        let warnings = InvoiceAggregator::aggregate(&mut records);

        assert_eq!(records[0].get(CanonicalField::InvoiceValue), &Cell::Number(Decimal::MAX));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].column, "IGST Amount*");
        assert_eq!(warnings[0].value, "1");
    }

    #[test]
    fn test_overflowing_invoice_total_keeps_first_lines() {
        let max = Decimal::MAX.to_string();
        let mut records = vec![line("INV1", &max, "", "", ""), line("INV1", &max, "", "", "")];
        let warnings = InvoiceAggregator::aggregate(&mut records);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].row, records[1].source_row());
        assert_eq!(warnings[0].column, "Invoice Value*");
        for record in &records {
            assert_eq!(record.get(CanonicalField::InvoiceValue), &Cell::Number(Decimal::MAX));
        }

        let mut again = records.clone();
        assert!(InvoiceAggregator::aggregate(&mut again).is_empty());
        assert_eq!(again, records);
    }

    #[test]
    fn test_aggregate_twice_is_noop() {
        let mut once = vec![
            line("INV1", "1000", "0", "90", "90"),
            line("INV1", "200", "", "10", "10"),
            line("INV2", "300.50", "54.09", "", ""),
        ];
        InvoiceAggregator::aggregate(&mut once);

        let mut twice = once.clone();
        let warnings = InvoiceAggregator::aggregate(&mut twice);

        assert!(warnings.is_empty());
        assert_eq!(once, twice);
    }
}
