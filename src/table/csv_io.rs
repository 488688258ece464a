//! CSV形式

use super::AnnotatedTable;
use crate::error::{MemeAiError, Result};
use std::path::Path;

pub(super) fn read(path: &Path) -> Result<AnnotatedTable> {
    let read_error = |e: csv::Error| MemeAiError::TableRead(format!("{}: {}", path.display(), e));

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_error)?;

    let headers = reader
        .headers()
        .map_err(read_error)?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_error)?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(AnnotatedTable::new(path.display().to_string(), headers, rows))
}

pub(super) fn to_bytes(table: &AnnotatedTable) -> Result<Vec<u8>> {
    let write_error = |message: String| MemeAiError::WriteFailure {
        path: table.source().to_string(),
        message,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.headers())
        .map_err(|e| write_error(e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row)
            .map_err(|e| write_error(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| write_error(e.to_string()))
}
