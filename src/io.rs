// 📂 File I/O - CSV intake/export and JSON sidecars
// Intake keeps every cell as text; numeric coercion is the pipeline's job.

use crate::attributes;
use crate::record::{CanonicalRecord, Cell, InputBatch};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

// ============================================================================
// INTAKE
// ============================================================================

/// Read a headered CSV file into an InputBatch.
pub fn read_csv(path: &Path) -> Result<InputBatch> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let batch = read_csv_from(file)
        .with_context(|| format!("Failed to read CSV from {}", path.display()))?;

    tracing::info!(
        file = %path.display(),
        columns = batch.headers.len(),
        rows = batch.len(),
        "input loaded"
    );
    Ok(batch)
}

/// Read CSV from any reader. Ragged rows are accepted: short rows are
/// padded with Null, extra fields are dropped.
pub fn read_csv_from<R: Read>(reader: R) -> Result<InputBatch> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut batch = InputBatch::new(headers);
    for (line_num, result) in reader.records().enumerate() {
        // +2: 1-indexed, plus the header row
        let record = result.with_context(|| format!("Failed to parse CSV line {}", line_num + 2))?;
        batch.push_row(record.iter().map(Cell::from_raw).collect());
    }

    Ok(batch)
}

// ============================================================================
// EXPORT
// ============================================================================

/// Write canonical records as CSV, template headers first.
pub fn write_csv(path: &Path, records: &[CanonicalRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    write_csv_to(BufWriter::new(file), records)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;

    tracing::info!(file = %path.display(), records = records.len(), "output written");
    Ok(())
}

pub fn write_csv_to<W: Write>(writer: W, records: &[CanonicalRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record(attributes::headers())?;
    for record in records {
        writer.write_record(record.cells().iter().map(Cell::render))?;
    }
    writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON file (dropdown sidecar, run report).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
