use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemeAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。GOOGLE_API_KEY を設定するか `meme-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("フォルダが見つかりません: {0}")]
    DirectoryNotFound(String),

    #[error("入力テーブルが見つかりません: {0}")]
    SourceNotFound(String),

    #[error("列 '{column}' がテーブルにありません: {source_path}")]
    MissingColumn { column: String, source_path: String },

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("テーブル読み込みエラー: {0}")]
    TableRead(String),

    #[error("書き込みに失敗しました ({path}): {message}")]
    WriteFailure { path: String, message: String },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] meme_ai_common::Error),
}

pub type Result<T> = std::result::Result<T, MemeAiError>;

/// 処理を中断したエラーの表示文（Display を使う）
pub fn fatal_message(err: &MemeAiError) -> String {
    format!("❌ {}", err)
}
