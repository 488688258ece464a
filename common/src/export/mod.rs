//! エクスポート共通処理

#[cfg(feature = "excel")]
pub mod excel_core;
