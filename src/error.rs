// ⚠️ Error Types - fail fast at batch entry
// Configuration and schema problems abort the run before any record is touched.
// Bad numeric cells are NOT errors: they degrade to warnings (see report.rs).

use thiserror::Error;

/// Top-level error returned by the normalization entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Problems with the run configuration (return period, alias table).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("return period is missing")]
    MissingReturnPeriod,

    #[error("return period must be exactly 6 digits (e.g. 072024), got {0:?}")]
    InvalidReturnPeriod(String),

    #[error("failed to load alias table {path}: {message}")]
    AliasFile { path: String, message: String },

    #[error("alias {source_column:?} targets unknown column {target:?}")]
    UnknownAliasTarget { source_column: String, target: String },
}

/// Problems with the shape of the raw input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("input has no invoice number column (columns: {})", .headers.join(", "))]
    MissingInvoiceNumberColumn { headers: Vec<String> },
}
