// 🔄 Normalization Pipeline
// raw rows → map → classify → aggregate → sequence → finalize
// Every stage is a pure pass over the whole batch; order matters.

use crate::aggregate::InvoiceAggregator;
use crate::attributes;
use crate::config::{EngineConfig, ReturnPeriod};
use crate::error::NormalizeError;
use crate::finalize::RecordFinalizer;
use crate::record::{CanonicalRecord, Cell, InputBatch};
use crate::report::NormalizationReport;
use crate::rules::{RuleContext, RuleEngine};
use crate::schema::SchemaMapper;
use crate::sequence::LineSequencer;
use indexmap::IndexMap;
use serde::Serialize;

/// Result of one run: the canonical records plus what happened on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub records: Vec<CanonicalRecord>,
    pub report: NormalizationReport,
}

impl NormalizedBatch {
    /// Output headers, canonical order
    pub fn headers(&self) -> Vec<&'static str> {
        attributes::headers()
    }

    /// Serializable view: headers, header → value rows, report
    pub fn to_output(&self) -> NormalizedOutput {
        NormalizedOutput {
            headers: self.headers(),
            records: self.records.iter().map(CanonicalRecord::to_map).collect(),
            report: self.report.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedOutput {
    pub headers: Vec<&'static str>,
    pub records: Vec<IndexMap<&'static str, Cell>>,
    pub report: NormalizationReport,
}

/// Run the whole pipeline over one batch.
///
/// Configuration and schema problems are reported before any record is
/// touched; the input batch itself is never modified.
pub fn normalize(batch: &InputBatch, config: &EngineConfig) -> Result<NormalizedBatch, NormalizeError> {
    let mut report = NormalizationReport {
        rows_read: batch.len(),
        ..Default::default()
    };

    // 1. Schema mapping (+ exclusion of empty / footer rows)
    let mapped = SchemaMapper::new(&config.aliases).map(batch)?;
    report.record_exclusions(&mapped.excluded);
    let mut records = mapped.records;
    tracing::info!(
        rows = batch.len(),
        kept = records.len(),
        excluded = report.rows_excluded(),
        "rows mapped to canonical schema"
    );

    // 2. Classification
    let ctx = RuleContext {
        return_period: &config.return_period,
    };
    let summary = RuleEngine::standard().classify(&mut records, &ctx);
    report.rule_hits = summary.hits;

    // 3. Aggregation
    report.warnings.extend(InvoiceAggregator::aggregate(&mut records));

    // 4. Line numbers
    LineSequencer::assign(&mut records);

    // 5. Finalization
    report.warnings.extend(RecordFinalizer::finalize(&mut records));

    report.record_output(&records);
    for warning in &report.warnings {
        warning.log();
    }
    tracing::info!("{}", report.summary());

    Ok(NormalizedBatch { records, report })
}

/// Convenience entry point taking the raw period string.
pub fn normalize_with_period(batch: &InputBatch, return_period: &str) -> Result<NormalizedBatch, NormalizeError> {
    let config = EngineConfig::new(ReturnPeriod::parse(return_period)?);
    normalize(batch, &config)
}

// ============================================================================
// TESTS
// ============================================================================
