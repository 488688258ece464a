//! Gemini API連携
//!
//! generateContent に画像（inline_data）と質問文を1件ずつ送信する。
//! HTTP 429 / RESOURCE_EXHAUSTED はレート制限として扱う。

use super::types::{AskError, ImageRecord, VisionModel};
use crate::error::{MemeAiError, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Gemini APIレスポンス
#[derive(Deserialize, Default)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// エラーレスポンス
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MemeAiError::ApiCall(format!("HTTPクライアント生成エラー: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// 接続先を差し替える（プロキシ・検証用）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

fn build_request(image: &ImageRecord, question: &str) -> GeminiRequest {
    let data = base64::engine::general_purpose::STANDARD.encode(&image.bytes);

    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.media_type.mime_type().to_string(),
                        data,
                    },
                },
                Part::Text { text: question.to_string() },
            ],
        }],
    }
}

/// 成功レスポンスから最初の候補のテキストを取り出す
fn extract_answer(response: GeminiResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
}

/// 失敗レスポンスを分類
fn classify_failure(status: StatusCode, body: &str) -> AskError {
    let (message, api_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.trim().to_string(), String::new()),
    };

    if status == StatusCode::TOO_MANY_REQUESTS || api_status == "RESOURCE_EXHAUSTED" {
        AskError::RateLimited(format!("{} {}", status.as_u16(), message))
    } else {
        AskError::Other(format!("HTTP {}: {}", status.as_u16(), message))
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn ask(&self, image: &ImageRecord, question: &str) -> std::result::Result<Option<String>, AskError> {
        let request = build_request(image, question);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AskError::Other(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AskError::Other(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        debug!("Gemini応答: {} bytes", body.len());

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| AskError::Other(format!("レスポンスのパースに失敗: {}", e)))?;

        Ok(extract_answer(parsed))
    }
}
