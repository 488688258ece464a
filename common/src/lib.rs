//! Meme AI Common Library
//!
//! 注釈ステージと集計ステージで共有される型とユーティリティ

pub mod types;
pub mod prompts;
pub mod error;
pub mod export;

pub use types::{
    Answer, AnnotationRow, FieldId, MediaType,
    ERROR_PREFIX, NO_CONTENT_SENTINEL, RATE_LIMITED_SENTINEL,
};
pub use prompts::{table_header, QuestionSpec, QUESTIONS};
pub use error::{Error, Result};
#[cfg(feature = "excel")]
pub use export::excel_core::{generate_workbook_buffer, Cell, SheetTable};
