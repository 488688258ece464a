//! ステージの実行
//!
//! 注釈: 画像フォルダ → 中間テーブル
//! 集計: 中間テーブル → Excelレポート

use crate::aggregator::{build_report, Report};
use crate::analyzer::{annotate_images, AnnotationOutcome, RetryPolicy, VisionModel};
use crate::config::AggregationConfig;
use crate::error::Result;
use crate::export::write_report;
use crate::scanner::scan_folder;
use crate::table::{read_table, write_annotations, TableFormat};
use indicatif::{ProgressBar, ProgressStyle};
use meme_ai_common::QuestionSpec;
use std::path::Path;
use tokio_util::sync::CancellationToken;

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("  [{bar:30}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

/// 注釈ステージを実行し、テーブルを書き出す
///
/// 画像が0枚、または行が0件の場合は書き込みをスキップする（エラーではない）。
pub async fn run_annotation<M: VisionModel + ?Sized>(
    folder: &Path,
    output: &Path,
    model: &M,
    policy: &RetryPolicy,
    questions: &[QuestionSpec],
    cancel: &CancellationToken,
    show_progress: bool,
) -> Result<AnnotationOutcome> {
    // 出力形式は処理前に確認
    TableFormat::for_write(output)?;

    println!("[1/2] 画像をスキャン中...");
    let images = scan_folder(folder)?;

    if images.is_empty() {
        println!("画像ファイルが見つかりません: {}", folder.display());
        return Ok(AnnotationOutcome::default());
    }
    println!("✔ {}枚の画像を検出\n", images.len());

    println!("[2/2] AI注釈中...");
    let progress = progress_bar(images.len() as u64, show_progress);
    let outcome = annotate_images(model, policy, &images, questions, cancel, &progress).await;

    if !outcome.skipped.is_empty() {
        println!("- 読み込めずスキップ: {}枚", outcome.skipped.len());
    }

    let written = write_annotations(&outcome.rows, output)?;
    if written == 0 {
        println!("保存する結果がありません");
    } else {
        println!("✔ 結果を保存: {} ({}件)", output.display(), written);
    }

    Ok(outcome)
}

/// 集計ステージを実行し、レポートを書き出す
pub fn run_aggregation(input: &Path, output: &Path, config: &AggregationConfig) -> Result<Report> {
    let table = read_table(input)?;
    println!("✔ テーブル読み込み: {}件", table.len());

    let report = build_report(&table, config)?;

    write_report(&report, output)?;
    println!("✔ レポートを保存: {}", output.display());

    Ok(report)
}
