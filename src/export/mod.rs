//! 集計レポートのExcel出力
//!
//! 5シートを固定順で1ファイルに書き出す。用語は Title Case で表示する。

use crate::aggregator::{title_case, FrequencyTable, Report};
use crate::error::{MemeAiError, Result};
use crate::output::write_atomic;
use meme_ai_common::{generate_workbook_buffer, Cell, SheetTable};
use std::path::Path;

pub const PEOPLE_SHEET: &str = "1_Top_People_Frequency";
pub const CO_OCCURRENCE_SHEET: &str = "2_People_Co-occurrence";
pub const CHARACTERISTICS_SHEET: &str = "3_Visual_Characteristics";
pub const SENTIMENT_SHEET: &str = "4_Visual_Sentiment";
pub const RELATIONSHIP_SHEET: &str = "5_People_Sentiment_Relationship";

const COUNT_HEADER: &str = "Count";
const CO_OCCURRENCE_HEADER: &str = "Co_occurrence_Count";

fn frequency_sheet(name: &str, label: &str, table: &FrequencyTable) -> SheetTable {
    let mut sheet = SheetTable::new(name, &[label, COUNT_HEADER]);
    for entry in &table.entries {
        sheet.push_row(vec![title_case(&entry.term).into(), entry.count.into()]);
    }
    sheet
}

/// レポートをシート定義に変換
pub fn report_sheets(report: &Report) -> Vec<SheetTable> {
    let mut co_occurrence = SheetTable::new(
        CO_OCCURRENCE_SHEET,
        &["Person_A", "Person_B", CO_OCCURRENCE_HEADER],
    );
    for pair in &report.people_co_occurrence.entries {
        co_occurrence.push_row(vec![
            title_case(&pair.first).into(),
            title_case(&pair.second).into(),
            pair.count.into(),
        ]);
    }

    let rel = &report.people_sentiment;
    let mut relationship = SheetTable::new(
        RELATIONSHIP_SHEET,
        &[rel.column_x.column_name(), rel.column_y.column_name(), CO_OCCURRENCE_HEADER],
    );
    for entry in &rel.entries {
        relationship.push_row(vec![
            title_case(&entry.x).into(),
            title_case(&entry.y).into(),
            Cell::Count(entry.count),
        ]);
    }

    vec![
        frequency_sheet(PEOPLE_SHEET, "Person", &report.people),
        co_occurrence,
        frequency_sheet(CHARACTERISTICS_SHEET, "Characteristic", &report.characteristics),
        frequency_sheet(SENTIMENT_SHEET, "Sentiment", &report.sentiments),
        relationship,
    ]
}

/// レポートをExcelに書き出す（一時ファイル経由で置き換え）
pub fn write_report(report: &Report, output_path: &Path) -> Result<()> {
    let buffer = generate_workbook_buffer(&report_sheets(report)).map_err(|e| {
        MemeAiError::WriteFailure {
            path: output_path.display().to_string(),
            message: e.to_string(),
        }
    })?;

    write_atomic(output_path, &buffer)
}

/// コンソールに集計概要を表示
pub fn print_summary(report: &Report, top_relationships: usize) {
    println!("  レコード数: {}", report.total_records);
    for table in [&report.people, &report.characteristics, &report.sentiments] {
        println!(
            "  '{}': ユニーク用語 {}件（無視語を除く）",
            table.column, table.unique_terms
        );
    }

    println!("\n人物 × トーン 上位{}件:", top_relationships);
    for entry in report.people_sentiment.entries.iter().take(top_relationships) {
        println!(
            "  {:<30} {:<20} {}",
            title_case(&entry.x),
            title_case(&entry.y),
            entry.count
        );
    }
}
