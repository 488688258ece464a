//! 質問定義モジュール
//!
//! 画像ごとにモデルへ送る固定の質問セット。
//! 順序は中間テーブルの列順と一致する。

use crate::types::FieldId;

/// 質問文と出力列の組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSpec {
    pub field: FieldId,
    pub text: &'static str,
}

/// 参照構成の質問セット（6問）
pub const QUESTIONS: &[QuestionSpec] = &[
    QuestionSpec {
        field: FieldId::WhoIsInImages,
        text: "List all prominent individuals or political figures explicitly depicted or strongly implied in this image, separated by commas. Pay special attention to recognizing Romanian politicians like Nicușor Dan, George Simion, Elena Lasconi, Traian Basescu, Marcel Ciolacu, Calin Georgescu. If no specific individual is identifiable, state 'Unknown'.",
    },
    QuestionSpec {
        field: FieldId::OverallSentiment,
        text: "What is the core political message or theme of this meme? Be concise, using keywords or a short phrase.",
    },
    QuestionSpec {
        field: FieldId::RomanianReferences,
        text: "List any specific Romanian political parties, symbols, or major events referenced in this meme, separated by commas. If none, state 'None'.",
    },
    QuestionSpec {
        field: FieldId::TextContent,
        text: "Transcribe any visible text in the image. If no text, state 'No text'.",
    },
    QuestionSpec {
        field: FieldId::VisualSentiment,
        text: "Describe the overall tone or sentiment of this meme using single words (e.g., 'satirical', 'critical', 'humorous', 'supportive', 'neutral'), separated by commas.",
    },
    QuestionSpec {
        field: FieldId::VisualCharacteristics,
        text: "Describe the key visual characteristics and style of this image using keywords (e.g., 'photograph', 'cartoon', 'drawing', 'collage', 'screenshot', 'hand-drawn', 'digital art', 'monochromatic', 'vibrant', 'simple', 'complex'), separated by commas.",
    },
];

/// 質問セットから中間テーブルのヘッダーを生成
pub fn table_header(questions: &[QuestionSpec]) -> Vec<&'static str> {
    std::iter::once(FieldId::FileName.column_name())
        .chain(questions.iter().map(|q| q.field.column_name()))
        .collect()
}
