use clap::Parser;
use meme_ai_common::QUESTIONS;
use meme_ai_rust::{analyzer, cli, config, error, export, pipeline};
use analyzer::{GeminiClient, RetryPolicy};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// コンソールに表示する人物 × トーンの件数
const SUMMARY_RELATIONSHIPS: usize = 20;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "meme_ai_rust=debug,meme_ai=debug"
    } else {
        "meme_ai_rust=info,meme_ai=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Ctrl+C で画像間の区切りにキャンセルする
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n中断要求を受け付けました。処理中の画像の完了後に停止します...");
            child.cancel();
        }
    });
    token
}

fn build_client(config: &Config, model: Option<String>) -> Result<GeminiClient> {
    // キー未設定ならスキャン前にエラー
    let api_key = config.get_api_key()?;
    let model = model.unwrap_or_else(|| config.model.clone());
    GeminiClient::new(api_key, model, config.timeout())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}", error::fatal_message(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Annotate { folder, output, model } => {
            println!("🖼 meme-ai - 画像注釈\n");

            let client = build_client(&config, model)?;
            println!("- モデル: {}\n", client.model());

            let policy = RetryPolicy::from(&config.retry);
            let cancel = cancel_on_ctrl_c();

            let outcome = pipeline::run_annotation(
                &folder, &output, &client, &policy, QUESTIONS, &cancel, !cli.verbose,
            )
            .await?;

            if outcome.cancelled {
                println!("\n⚠ 中断しました（{}件を保存）", outcome.rows.len());
            } else {
                println!("\n✅ 注釈完了");
            }
        }

        Commands::Aggregate { input, output, include_failed } => {
            println!("📊 meme-ai - 集計\n");

            let mut aggregation = config.aggregation.clone();
            if include_failed {
                aggregation.include_failed_answers = true;
            }

            let report = pipeline::run_aggregation(&input, &output, &aggregation)?;
            export::print_summary(&report, SUMMARY_RELATIONSHIPS);

            println!("\n✅ 集計完了");
        }

        Commands::Run { folder, table, output, model } => {
            println!("🚀 meme-ai - 一括処理\n");

            let client = build_client(&config, model)?;
            let policy = RetryPolicy::from(&config.retry);
            let cancel = cancel_on_ctrl_c();

            // 1. 注釈
            println!("=== 注釈ステージ ===");
            let outcome = pipeline::run_annotation(
                &folder, &table, &client, &policy, QUESTIONS, &cancel, !cli.verbose,
            )
            .await?;

            if outcome.rows.is_empty() {
                println!("\n注釈結果がないため集計をスキップします");
                return Ok(());
            }
            if outcome.cancelled {
                println!("\n⚠ 中断しました（{}件を保存）。集計はスキップします", outcome.rows.len());
                return Ok(());
            }

            // 2. 集計（保存したテーブルを読み直す）
            println!("\n=== 集計ステージ ===");
            let report = pipeline::run_aggregation(&table, &output, &config.aggregation)?;
            export::print_summary(&report, SUMMARY_RELATIONSHIPS);

            println!("\n✅ 完了");
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  最大リトライ回数: {}", config.retry.max_retries);
                println!(
                    "  バックオフ: 初期{}秒 / 上限{}秒 / ジッター{}",
                    config.retry.initial_delay_seconds,
                    config.retry.max_delay_seconds,
                    config.retry.jitter_factor
                );
                println!("  失敗回答の集計: {}", if config.aggregation.include_failed_answers { "含める" } else { "除外" });
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
