//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use meme_ai_rust::error::{fatal_message, MemeAiError};
use meme_ai_rust::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, MemeAiError::DirectoryNotFound(_)));
}

/// ファイルをフォルダとして指定した場合
#[test]
fn test_scan_file_instead_of_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("meme.png");
    std::fs::write(&file, b"x").unwrap();

    let result = scanner::scan_folder(&file);
    assert!(matches!(result, Err(MemeAiError::DirectoryNotFound(_))));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_folder(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// MemeAiErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        MemeAiError::Config("テスト設定エラー".to_string()),
        MemeAiError::MissingApiKey,
        MemeAiError::DirectoryNotFound("/path/to/folder".to_string()),
        MemeAiError::SourceNotFound("table.csv".to_string()),
        MemeAiError::MissingColumn {
            column: "visual_sentiment".to_string(),
            source_path: "table.csv".to_string(),
        },
        MemeAiError::ImageLoad("broken.png".to_string()),
        MemeAiError::ApiCall("API呼び出し失敗".to_string()),
        MemeAiError::TableRead("壊れたCSV".to_string()),
        MemeAiError::WriteFailure {
            path: "out.xlsx".to_string(),
            message: "permission denied".to_string(),
        },
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingColumnは列名と入力元を含む
#[test]
fn test_missing_column_message() {
    let err = MemeAiError::MissingColumn {
        column: "who_is_in_images".to_string(),
        source_path: "results.csv".to_string(),
    };
    let display = format!("{}", err);

    assert!(display.contains("who_is_in_images"));
    assert!(display.contains("results.csv"));
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let err = MemeAiError::MissingApiKey;
    let display = format!("{}", err);

    assert!(display.contains("APIキー"));
    assert!(display.contains("GOOGLE_API_KEY"));
    assert!(display.contains("meme-ai config"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: MemeAiError = io_err.into();

    assert!(matches!(err, MemeAiError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: MemeAiError = json_err.into();

    assert!(matches!(err, MemeAiError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = meme_ai_common::Error::Excel("シート名が不正".to_string());
    let err: MemeAiError = common_err.into();

    assert!(matches!(err, MemeAiError::Common(_)));
    assert!(format!("{}", err).contains("シート名が不正"));
}

/// 中断時の表示はDisplayの文面を使う
#[test]
fn test_fatal_message_uses_display() {
    let message = fatal_message(&MemeAiError::MissingApiKey);
    assert!(message.starts_with("❌ "));
    assert!(message.contains("GOOGLE_API_KEY"));
    assert!(message.contains("meme-ai config"));
    assert!(!message.contains("MissingApiKey"));

    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "x");
    let message = fatal_message(&MemeAiError::from(io_err));
    assert!(message.contains("IOエラー: x"));
    assert!(!message.contains("Custom"));

    let message = fatal_message(&MemeAiError::MissingColumn {
        column: "visual_sentiment".to_string(),
        source_path: "results.csv".to_string(),
    });
    assert!(message.contains("visual_sentiment"));
    assert!(!message.contains("MissingColumn"));
}
