// ✅ Normalization Report - what happened to a batch
// Unparseable numbers never abort a run; they end up here as warnings.

use crate::attributes::CanonicalField;
use crate::record::CanonicalRecord;
use crate::schema::ExclusionReason;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key used in `invoice_types` for records no rule classified.
pub const UNCLASSIFIED: &str = "unclassified";

// ============================================================================
// COERCION WARNING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Aggregation,
    Finalization,
}

/// A numeric cell that could not be parsed and was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoercionWarning {
    /// Input row index (0-based, before exclusion)
    pub row: usize,
    pub invoice: Option<String>,
    pub column: &'static str,
    pub value: String,
    pub stage: Stage,
}

impl CoercionWarning {
    pub fn new(record: &CanonicalRecord, field: CanonicalField, value: &str, stage: Stage) -> Self {
        CoercionWarning {
            row: record.source_row(),
            invoice: record.invoice_key(),
            column: field.header(),
            value: value.to_string(),
            stage,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "row {} ({}): {} value {:?} is not a number",
            self.row,
            self.invoice.as_deref().unwrap_or("no invoice"),
            self.column,
            self.value
        )
    }

    pub(crate) fn log(&self) {
        tracing::warn!(
            row = self.row,
            column = self.column,
            value = %self.value,
            stage = ?self.stage,
            "numeric value coerced"
        );
    }
}

// ============================================================================
// NORMALIZATION REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    pub rows_read: usize,
    pub empty_rows: usize,
    pub missing_invoice_rows: usize,
    pub total_rows: usize,
    pub records_emitted: usize,
    pub invoice_count: usize,
    /// Invoice Type → number of line items, in first-seen order
    pub invoice_types: IndexMap<String, usize>,
    /// Rule id → number of records it fired on
    pub rule_hits: IndexMap<&'static str, usize>,
    pub warnings: Vec<CoercionWarning>,
}

impl NormalizationReport {
    pub fn rows_excluded(&self) -> usize {
        self.empty_rows + self.missing_invoice_rows + self.total_rows
    }

    pub(crate) fn record_exclusions(&mut self, excluded: &[(usize, ExclusionReason)]) {
        for (_, reason) in excluded {
            match reason {
                ExclusionReason::EmptyRow => self.empty_rows += 1,
                ExclusionReason::MissingInvoiceNumber => self.missing_invoice_rows += 1,
                ExclusionReason::TotalRow => self.total_rows += 1,
            }
        }
    }

    pub(crate) fn record_output(&mut self, records: &[CanonicalRecord]) {
        self.records_emitted = records.len();

        let mut invoices = HashSet::new();
        for record in records {
            invoices.insert(record.invoice_key());

            let invoice_type = record
                .text(CanonicalField::InvoiceType)
                .map(|t| t.into_owned())
                .unwrap_or_else(|| UNCLASSIFIED.to_string());
            *self.invoice_types.entry(invoice_type).or_insert(0) += 1;
        }
        self.invoice_count = invoices.len();
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn summary(&self) -> String {
        let types = self
            .invoice_types
            .iter()
            .map(|(t, n)| format!("{}={}", t, n))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{} rows read, {} excluded | {} records across {} invoices [{}] | {} warnings",
            self.rows_read,
            self.rows_excluded(),
            self.records_emitted,
            self.invoice_count,
            types,
            self.warnings.len()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
