//! Excel生成（共通ライブラリ）
//!
//! ヘッダー行＋データ行の単純な表をシートごとに書き出す。
//! 集計レポートと中間テーブル（.xlsx指定時）の両方で使用。

use crate::error::{Error, Result};
use rust_xlsxwriter::*;

/// 列幅の上限（文字数）
const MAX_COLUMN_WIDTH: usize = 60;

/// セル値
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Count(u64),
}

impl Cell {
    fn display_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Count(n) => n.to_string().len(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Count(n)
    }
}

/// 1シート分の表
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// 列ごとの表示幅（ヘッダーと全セルの最大文字数）
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.display_len());
                }
            }
        }
        widths
    }
}

/// 表の並びからExcelをバッファに生成
///
/// # Arguments
/// * `sheets` - シート定義（この順で追加される）
///
/// # Returns
/// xlsxファイルのバイト列
pub fn generate_workbook_buffer(sheets: &[SheetTable]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let count_format = Format::new().set_align(FormatAlign::Right);

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .map_err(|e| Error::Excel(format!("シート名設定エラー ({}): {}", sheet.name, e)))?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, header, &header_format)
                .map_err(|e| Error::Excel(format!("ヘッダー書き込みエラー: {}", e)))?;
        }

        for (i, row) in sheet.rows.iter().enumerate() {
            let row_num = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col_num = col as u16;
                match cell {
                    Cell::Text(s) => worksheet.write_string(row_num, col_num, s),
                    Cell::Count(n) => {
                        worksheet.write_number_with_format(row_num, col_num, *n as f64, &count_format)
                    }
                }
                .map_err(|e| Error::Excel(format!("セル書き込みエラー: {}", e)))?;
            }
        }

        for (col, width) in sheet.column_widths().into_iter().enumerate() {
            let width = (width.min(MAX_COLUMN_WIDTH) + 2) as f64;
            worksheet
                .set_column_width(col as u16, width)
                .map_err(|e| Error::Excel(format!("列幅設定エラー: {}", e)))?;
        }

        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| Error::Excel(format!("ウィンドウ枠固定エラー: {}", e)))?;
    }

    // バッファに書き出し
    workbook
        .save_to_buffer()
        .map_err(|e| Error::Excel(format!("Excel保存エラー: {}", e)))
}
