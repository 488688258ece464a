//! スプレッドシート形式
//!
//! 書き込みは先頭シート1枚の .xlsx、読み込みは calamine が扱える形式の先頭シート。

use super::AnnotatedTable;
use crate::error::{MemeAiError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use meme_ai_common::{generate_workbook_buffer, Cell, SheetTable};
use std::path::Path;

/// 中間テーブルのシート名
const TABLE_SHEET_NAME: &str = "annotations";

pub(super) fn read(path: &Path) -> Result<AnnotatedTable> {
    let read_error = |message: String| MemeAiError::TableRead(format!("{}: {}", path.display(), message));

    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_error("シートがありません".into()))?
        .map_err(|e| read_error(e.to_string()))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    let rows = rows.collect();

    Ok(AnnotatedTable::new(path.display().to_string(), headers, rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

pub(super) fn to_bytes(table: &AnnotatedTable) -> Result<Vec<u8>> {
    let headers: Vec<&str> = table.headers().iter().map(String::as_str).collect();
    let mut sheet = SheetTable::new(TABLE_SHEET_NAME, &headers);
    for row in table.rows() {
        sheet.push_row(row.iter().map(|v| Cell::from(v.as_str())).collect());
    }

    generate_workbook_buffer(&[sheet]).map_err(|e| MemeAiError::WriteFailure {
        path: table.source().to_string(),
        message: e.to_string(),
    })
}
