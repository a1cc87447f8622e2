// GSTR-1 Normalizer - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod attributes;     // Template columns, in output order
pub mod record;         // Cells, input rows, canonical rows
pub mod error;          // Configuration / schema errors
pub mod config;         // Return period + alias table per run
pub mod schema;         // Column mapping and row exclusion
pub mod rules;          // Classification rules
pub mod aggregate;      // Per-invoice totals
pub mod sequence;       // Line item numbering
pub mod finalize;       // Numeric normalization
pub mod report;         // Run report and coercion warnings
pub mod dropdowns;      // Enumerated value lists
pub mod io;             // CSV intake/export, JSON sidecars
pub mod pipeline;       // map → classify → aggregate → sequence → finalize

// Re-export commonly used types
pub use attributes::{AttributeDefinition, AttributeType, CanonicalField, DEFINITIONS, FIELD_COUNT};
pub use record::{CanonicalRecord, Cell, InputBatch, InputRecord};
pub use error::{ConfigError, NormalizeError, SchemaError};
pub use config::{EngineConfig, ReturnPeriod};
pub use schema::{AliasTable, ColumnPlan, ExclusionReason, MappedBatch, SchemaMapper};
pub use rules::{ClassificationSummary, FieldRule, RuleContext, RuleEngine};
pub use aggregate::InvoiceAggregator;
pub use sequence::LineSequencer;
pub use finalize::RecordFinalizer;
pub use report::{CoercionWarning, NormalizationReport, Stage};
pub use dropdowns::{dropdowns_by_header, standard_dropdowns, DropdownList};
pub use io::{read_csv, read_csv_from, write_csv, write_csv_to, write_json};
pub use pipeline::{normalize, normalize_with_period, NormalizedBatch, NormalizedOutput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
