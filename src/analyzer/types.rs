use crate::error::{MemeAiError, Result};
use crate::scanner::ImageInfo;
use async_trait::async_trait;
use meme_ai_common::MediaType;
use thiserror::Error;

/// 読み込み済みの画像（1行分の処理が終われば破棄する）
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

impl ImageRecord {
    /// 画像を読み込み、画像として判別できるか確認する
    pub fn load(info: &ImageInfo) -> Result<Self> {
        let bytes = std::fs::read(&info.path)
            .map_err(|e| MemeAiError::ImageLoad(format!("{}: {}", info.file_name, e)))?;

        image::guess_format(&bytes)
            .map_err(|e| MemeAiError::ImageLoad(format!("{}: {}", info.file_name, e)))?;

        Ok(Self {
            media_type: MediaType::from_file_name(&info.file_name),
            file_name: info.file_name.clone(),
            bytes,
        })
    }
}

/// モデル呼び出しの失敗種別
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    /// レート制限（リトライ対象）
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("{0}")]
    Other(String),
}

/// 画像と質問文を受け取り回答を返すモデル
///
/// `Ok(None)` は応答に内容がなかったことを表す。
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn ask(&self, image: &ImageRecord, question: &str) -> std::result::Result<Option<String>, AskError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_load_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meme.png");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let info = ImageInfo { path, file_name: "meme.png".into() };
        let record = ImageRecord::load(&info).unwrap();
        assert_eq!(record.media_type, MediaType::Png);
        assert_eq!(record.bytes, PNG_MAGIC);
    }

    #[test]
    fn test_load_rejects_non_image_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let info = ImageInfo { path, file_name: "broken.jpg".into() };
        assert!(matches!(ImageRecord::load(&info), Err(MemeAiError::ImageLoad(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let info = ImageInfo {
            path: PathBuf::from("/nonexistent/meme.png"),
            file_name: "meme.png".into(),
        };
        assert!(matches!(ImageRecord::load(&info), Err(MemeAiError::ImageLoad(_))));
    }
}
