//! 中間テーブル（注釈結果）の入出力
//!
//! 列名が注釈ステージと集計ステージの間の契約。
//! 形式は拡張子で判定する（書き込み: .csv / .xlsx、読み込み: .csv / .xlsx / .xlsm / .xls / .ods）。

mod csv_io;
mod xlsx_io;

use crate::error::{MemeAiError, Result};
use crate::output::write_atomic;
use meme_ai_common::{AnnotationRow, FieldId};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
}

impl TableFormat {
    fn extension(path: &Path) -> String {
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// 読み込み形式（不明な拡張子はCSV扱い）
    pub fn for_read(path: &Path) -> Self {
        match Self::extension(path).as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => TableFormat::Spreadsheet,
            _ => TableFormat::Csv,
        }
    }

    /// 書き込み形式
    pub fn for_write(path: &Path) -> Result<Self> {
        match Self::extension(path).as_str() {
            "xlsx" => Ok(TableFormat::Spreadsheet),
            "csv" | "" => Ok(TableFormat::Csv),
            other => Err(MemeAiError::Config(format!(
                "未対応の出力形式: .{}（.csv または .xlsx を指定してください）",
                other
            ))),
        }
    }
}

/// ヘッダー＋行の表
#[derive(Debug, Clone, Default)]
pub struct AnnotatedTable {
    source: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl AnnotatedTable {
    pub fn new(source: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            source: source.into(),
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows,
        }
    }

    /// 注釈行から表を構築
    pub fn from_rows(source: impl Into<String>, rows: &[AnnotationRow]) -> Self {
        let headers = rows
            .first()
            .map(|r| r.header().into_iter().map(String::from).collect())
            .unwrap_or_default();
        let records = rows.iter().map(|r| r.to_record()).collect();
        Self::new(source, headers, records)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, field: FieldId) -> Result<usize> {
        let name = field.column_name();
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| MemeAiError::MissingColumn {
                column: name.to_string(),
                source_path: self.source.clone(),
            })
    }

    /// 列の値（欠けたセルは空文字）
    pub fn column(&self, field: FieldId) -> Result<impl Iterator<Item = &str> + '_> {
        let index = self.column_index(field)?;
        Ok(self
            .rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or("")))
    }
}

/// 入力テーブルを読み込む
pub fn read_table(path: &Path) -> Result<AnnotatedTable> {
    if !path.is_file() {
        return Err(MemeAiError::SourceNotFound(path.display().to_string()));
    }

    match TableFormat::for_read(path) {
        TableFormat::Csv => csv_io::read(path),
        TableFormat::Spreadsheet => xlsx_io::read(path),
    }
}

/// 注釈結果を一括で書き出す
///
/// # Returns
/// 書き出した行数（0件の場合は書き込まない）
pub fn write_annotations(rows: &[AnnotationRow], path: &Path) -> Result<usize> {
    let format = TableFormat::for_write(path)?;

    if rows.is_empty() {
        return Ok(0);
    }

    let table = AnnotatedTable::from_rows(path.display().to_string(), rows);
    let bytes = match format {
        TableFormat::Csv => csv_io::to_bytes(&table)?,
        TableFormat::Spreadsheet => xlsx_io::to_bytes(&table)?,
    };

    write_atomic(path, &bytes)?;
    Ok(rows.len())
}
