use crate::error::{MemeAiError, Result};
use meme_ai_common::FieldId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// APIキーを読む環境変数（先頭優先）
const API_KEY_ENV_VARS: &[&str] = &["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// リトライ待機時間の上限（秒）
pub const MAX_RETRY_DELAY_SECONDS: f64 = 3600.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
    pub retry: RetryConfig,
    pub aggregation: AggregationConfig,
}

/// レート制限時のリトライ設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_seconds: f64,
    pub max_delay_seconds: f64,
    pub jitter_factor: f64,
}

/// 集計設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub people_field: FieldId,
    pub characteristics_field: FieldId,
    pub sentiment_field: FieldId,
    pub ignore_terms: Vec<String>,
    pub top_people: usize,
    /// 共起計算の対象にする上位人物数
    pub co_occurrence_pool: usize,
    pub top_pairs: usize,
    pub top_characteristics: usize,
    pub top_sentiments: usize,
    /// 失敗回答（レート制限・エラー）のセルも集計に含める
    pub include_failed_answers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".into(),
            timeout_seconds: 120,
            retry: RetryConfig::default(),
            aggregation: AggregationConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_seconds: 0.5,
            max_delay_seconds: 5.0,
            jitter_factor: 0.1,
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            people_field: FieldId::WhoIsInImages,
            characteristics_field: FieldId::VisualCharacteristics,
            sentiment_field: FieldId::VisualSentiment,
            ignore_terms: ["unknown", "no text", "none", "error", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            top_people: 50,
            co_occurrence_pool: 20,
            top_pairs: 100,
            top_characteristics: 50,
            top_sentiments: 5,
            include_failed_answers: false,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(MemeAiError::Config("retry.max_retries は1以上にしてください".into()));
        }
        for delay in [self.initial_delay_seconds, self.max_delay_seconds] {
            if !(0.0..=MAX_RETRY_DELAY_SECONDS).contains(&delay) {
                return Err(MemeAiError::Config(format!(
                    "リトライ待機時間は0〜{}秒にしてください: {}",
                    MAX_RETRY_DELAY_SECONDS, delay
                )));
            }
        }
        if !(0.0..1.0).contains(&self.jitter_factor) {
            return Err(MemeAiError::Config("retry.jitter_factor は0以上1未満にしてください".into()));
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)?
        } else {
            Self::default()
        };

        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.retry.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MemeAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("meme-ai").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Ok(key);
                }
            }
        }

        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(MemeAiError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
