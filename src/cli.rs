use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 中間テーブルの既定ファイル名
pub const DEFAULT_TABLE_PATH: &str = "romanian_meme_analysis_results_local.csv";

/// 集計レポートの既定ファイル名
pub const DEFAULT_REPORT_PATH: &str = "meme_analysis_results_FINAL.xlsx";

#[derive(Parser)]
#[command(name = "meme-ai")]
#[command(about = "ミーム画像AI注釈・集計レポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像フォルダを解析して注釈テーブル（CSV/XLSX）を出力
    Annotate {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力テーブル（拡張子 .csv / .xlsx）
        #[arg(short, long, default_value = DEFAULT_TABLE_PATH)]
        output: PathBuf,

        /// 使用するモデル（省略時は設定値）
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 注釈テーブルを集計してExcelレポートを出力
    Aggregate {
        /// 入力テーブル（.csv / .xlsx）
        #[arg(default_value = DEFAULT_TABLE_PATH)]
        input: PathBuf,

        /// 出力Excelファイル
        #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// 失敗回答（レート制限・エラー）のセルも集計に含める
        #[arg(long)]
        include_failed: bool,
    },

    /// 注釈から集計まで一括実行
    Run {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 中間テーブル
        #[arg(short, long, default_value = DEFAULT_TABLE_PATH)]
        table: PathBuf,

        /// 出力Excelファイル
        #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// 使用するモデル（省略時は設定値）
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
