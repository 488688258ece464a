//! 注釈データの型定義
//!
//! 注釈ステージと集計ステージで共有される型:
//! - FieldId: 中間テーブルの列識別子（列名が両ステージ間の契約）
//! - MediaType: 拡張子から推定する画像MIMEタイプ
//! - Answer: 1問分の回答（成功/失敗種別をタグで保持）
//! - AnnotationRow: 画像1枚分の回答行

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// レート制限でリトライを使い切った場合のセル値
pub const RATE_LIMITED_SENTINEL: &str = "Failed to get answer due to repeated rate limits.";

/// モデルが内容を返さなかった場合のセル値
pub const NO_CONTENT_SENTINEL: &str = "No clear answer or content received.";

/// エラー回答のセル値プレフィックス
pub const ERROR_PREFIX: &str = "Error: ";

/// 中間テーブルの列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FileName,
    WhoIsInImages,
    OverallSentiment,
    RomanianReferences,
    TextContent,
    VisualSentiment,
    VisualCharacteristics,
}

impl FieldId {
    /// テーブル上の全列（出力順）
    pub const ALL: [FieldId; 7] = [
        FieldId::FileName,
        FieldId::WhoIsInImages,
        FieldId::OverallSentiment,
        FieldId::RomanianReferences,
        FieldId::TextContent,
        FieldId::VisualSentiment,
        FieldId::VisualCharacteristics,
    ];

    /// 列名
    pub fn column_name(&self) -> &'static str {
        match self {
            FieldId::FileName => "file_name",
            FieldId::WhoIsInImages => "who_is_in_images",
            FieldId::OverallSentiment => "overall_sentiment",
            FieldId::RomanianReferences => "romanian_references",
            FieldId::TextContent => "text_content",
            FieldId::VisualSentiment => "visual_sentiment",
            FieldId::VisualCharacteristics => "visual_characteristics",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .iter()
            .copied()
            .find(|f| f.column_name() == s)
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// 画像のMIMEタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Webp,
    Jpeg,
}

impl MediaType {
    /// ファイル名の拡張子から推定（.png/.webp以外はすべてJPEG扱い）
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".png") {
            MediaType::Png
        } else if lower.ends_with(".webp") {
            MediaType::Webp
        } else {
            MediaType::Jpeg
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Jpeg => "image/jpeg",
        }
    }
}

/// 1問分の回答
///
/// 失敗はタグとして保持し、センチネル文字列はセル出力時にのみ生成する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// モデルの回答テキスト
    Text(String),
    /// 応答に内容がなかった
    NoContent,
    /// レート制限でリトライを使い切った
    RateLimited,
    /// その他のエラー（メッセージ）
    Failed(String),
}

impl Answer {
    /// テーブルのセル値に変換
    pub fn to_cell(&self) -> String {
        match self {
            Answer::Text(text) => text.clone(),
            Answer::NoContent => NO_CONTENT_SENTINEL.to_string(),
            Answer::RateLimited => RATE_LIMITED_SENTINEL.to_string(),
            Answer::Failed(message) => format!("{}{}", ERROR_PREFIX, message),
        }
    }

    /// 保存済みセル値から回答種別を復元
    pub fn from_cell(cell: &str) -> Self {
        if cell == RATE_LIMITED_SENTINEL {
            Answer::RateLimited
        } else if cell == NO_CONTENT_SENTINEL {
            Answer::NoContent
        } else if let Some(message) = cell.strip_prefix(ERROR_PREFIX) {
            Answer::Failed(message.to_string())
        } else {
            Answer::Text(cell.to_string())
        }
    }

    /// 回答取得に失敗したか（内容なしは失敗に含めない）
    pub fn is_failure(&self) -> bool {
        matches!(self, Answer::RateLimited | Answer::Failed(_))
    }
}

/// 画像1枚分の注釈行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub file_name: String,
    /// 質問順の回答
    pub answers: Vec<(FieldId, Answer)>,
}

impl AnnotationRow {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            answers: Vec::new(),
        }
    }

    pub fn push(&mut self, field: FieldId, answer: Answer) {
        self.answers.push((field, answer));
    }

    pub fn answer(&self, field: FieldId) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, a)| a)
    }

    /// ヘッダー（file_name + 回答の列名）
    pub fn header(&self) -> Vec<&'static str> {
        std::iter::once(FieldId::FileName.column_name())
            .chain(self.answers.iter().map(|(f, _)| f.column_name()))
            .collect()
    }

    /// セル値の並び（ヘッダーと同順）
    pub fn to_record(&self) -> Vec<String> {
        std::iter::once(self.file_name.clone())
            .chain(self.answers.iter().map(|(_, a)| a.to_cell()))
            .collect()
    }
}
