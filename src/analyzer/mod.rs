//! 注釈ステージ
//!
//! 画像1枚ごとに固定の質問セットをモデルへ順番に送り、回答行を組み立てる。
//! - 画像の読み込み失敗: その画像のみスキップ
//! - 質問の失敗: センチネル値で埋めて次の質問へ
//! - キャンセル: 画像と画像の間でのみ確認

mod gemini;
pub mod retry;
mod types;

pub use gemini::GeminiClient;
pub use retry::RetryPolicy;
pub use types::{AskError, ImageRecord, VisionModel};

use crate::scanner::ImageInfo;
use indicatif::ProgressBar;
use meme_ai_common::{AnnotationRow, QuestionSpec};
use retry::preview;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 注釈処理の結果
#[derive(Debug, Default)]
pub struct AnnotationOutcome {
    /// 入力順の回答行
    pub rows: Vec<AnnotationRow>,
    /// 読み込めずスキップした画像
    pub skipped: Vec<String>,
    /// 途中でキャンセルされたか
    pub cancelled: bool,
}

/// 画像1枚分の全質問を実行
pub async fn annotate_image<M: VisionModel + ?Sized>(
    model: &M,
    policy: &RetryPolicy,
    image: &ImageRecord,
    questions: &[QuestionSpec],
) -> AnnotationRow {
    let mut row = AnnotationRow::new(image.file_name.clone());

    for question in questions {
        let answer = policy.ask_with_retry(model, image, question.text).await;

        debug!("  Q: {}...", preview(question.text, 50));
        debug!("  A: {}...", preview(&answer.to_cell(), 100));

        row.push(question.field, answer);
    }

    row
}

/// 画像を1枚ずつ順番に注釈する
pub async fn annotate_images<M: VisionModel + ?Sized>(
    model: &M,
    policy: &RetryPolicy,
    images: &[ImageInfo],
    questions: &[QuestionSpec],
    cancel: &CancellationToken,
    progress: &ProgressBar,
) -> AnnotationOutcome {
    let mut outcome = AnnotationOutcome::default();

    for (i, info) in images.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!("キャンセルされました（{}/{}枚処理済み）", i, images.len());
            outcome.cancelled = true;
            break;
        }

        progress.set_message(info.file_name.clone());
        info!("処理中 {}/{}: {}", i + 1, images.len(), info.file_name);

        match ImageRecord::load(info) {
            Ok(record) => {
                let row = annotate_image(model, policy, &record, questions).await;
                outcome.rows.push(row);
            }
            Err(e) => {
                warn!("画像をスキップ: {}", e);
                outcome.skipped.push(info.file_name.clone());
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    outcome
}
