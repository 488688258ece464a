//! レート制限リトライ
//!
//! 質問1件ごとに、レート制限エラーのみ指数バックオフ＋ジッターで再試行する。
//! 上限に達した場合は `Answer::RateLimited` を返し、行や実行全体は中断しない。

use super::types::{AskError, ImageRecord, VisionModel};
use crate::config::{RetryConfig, MAX_RETRY_DELAY_SECONDS};
use meme_ai_common::Answer;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

/// 待機時間の下限（秒）
const MIN_DELAY_SECONDS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: f64,
    pub max_delay: f64,
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: config.initial_delay_seconds,
            max_delay: config.max_delay_seconds,
            jitter_factor: config.jitter_factor,
        }
    }
}

impl RetryPolicy {
    /// k回目（1始まり）の再試行前の待機秒数（ジッター前）
    pub fn base_delay(&self, attempt: u32) -> f64 {
        let exponent = attempt.saturating_sub(1).min(63) as i32;
        (self.initial_delay * 2f64.powi(exponent)).min(self.max_delay)
    }

    /// ジッターを加えた待機時間（下限1秒）
    pub fn jittered_delay<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base = self.base_delay(attempt);
        let spread = base * self.jitter_factor;
        let jitter = if spread.is_finite() && spread > 0.0 {
            rng.random_range(-spread..=spread)
        } else {
            0.0
        };
        let seconds = (base + jitter).max(MIN_DELAY_SECONDS);

        // 範囲外の値は上限で打ち切る
        Duration::try_from_secs_f64(seconds)
            .or_else(|_| Duration::try_from_secs_f64(self.max_delay))
            .unwrap_or_else(|_| Duration::from_secs_f64(MAX_RETRY_DELAY_SECONDS))
    }

    /// 質問1件を実行（レート制限時のみ再試行）
    pub async fn ask_with_retry<M: VisionModel + ?Sized>(
        &self,
        model: &M,
        image: &ImageRecord,
        question: &str,
    ) -> Answer {
        let mut attempt: u32 = 0;

        loop {
            match model.ask(image, question).await {
                Ok(Some(text)) => return Answer::Text(text),
                Ok(None) => return Answer::NoContent,
                Err(AskError::RateLimited(message)) => {
                    attempt += 1;
                    if attempt >= self.max_retries {
                        warn!(
                            "リトライ上限 ({}) に到達: {} - {}",
                            self.max_retries,
                            image.file_name,
                            preview(question, 50)
                        );
                        return Answer::RateLimited;
                    }

                    let delay = self.jittered_delay(attempt, &mut rand::rng());
                    warn!(
                        "レート制限 (429)。{:.2}秒後に再試行 ({}/{}): {}",
                        delay.as_secs_f64(),
                        attempt,
                        self.max_retries,
                        message
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(AskError::Other(message)) => {
                    warn!("予期しないエラー: {} - {}: {}", image.file_name, preview(question, 50), message);
                    return Answer::Failed(message);
                }
            }
        }
    }
}

/// ログ用に先頭n文字を切り出す
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
