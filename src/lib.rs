//! meme-ai-rust
//!
//! ミーム画像をビジョンモデルで注釈し、注釈テーブルを集計してExcelレポートを生成する。

pub mod aggregator;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod scanner;
pub mod table;
