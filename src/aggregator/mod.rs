//! 集計ステージ
//!
//! 注釈テーブルから以下を算出する:
//! 1. 人物の出現頻度
//! 2. 上位人物同士の共起
//! 3. 視覚的特徴の出現頻度
//! 4. トーン（視覚的センチメント）の出現頻度
//! 5. 人物 × トーンのクロス集計
//!
//! 集計は常に小文字化した正規形で行い、Title Case は出力時にのみ適用する。

pub mod co_occurrence;
pub mod frequency;
pub mod relationship;
pub mod terms;

pub use co_occurrence::{co_occurrence, CoOccurrenceTable, PairCount};
pub use frequency::{normalize_and_count, FrequencyTable, TermCount};
pub use relationship::{relationship, RelationshipCount, RelationshipTable};
pub use terms::{title_case, TermNormalizer};

use crate::config::AggregationConfig;
use crate::error::Result;
use crate::table::AnnotatedTable;
use tracing::info;

/// 集計結果一式
#[derive(Debug, Clone)]
pub struct Report {
    pub total_records: usize,
    pub people: FrequencyTable,
    pub people_co_occurrence: CoOccurrenceTable,
    pub characteristics: FrequencyTable,
    pub sentiments: FrequencyTable,
    pub people_sentiment: RelationshipTable,
}

/// テーブルから全集計を実行
pub fn build_report(table: &AnnotatedTable, config: &AggregationConfig) -> Result<Report> {
    let normalizer = TermNormalizer::from_config(config);

    let people = normalize_and_count(table, config.people_field, &normalizer, config.top_people)?;
    info!("'{}': ユニーク用語 {}件", config.people_field, people.unique_terms);

    let pool = people.top_terms(config.co_occurrence_pool);
    let people_co_occurrence = co_occurrence(
        table,
        config.people_field,
        &pool,
        &normalizer,
        config.top_pairs,
    )?;

    let characteristics = normalize_and_count(
        table,
        config.characteristics_field,
        &normalizer,
        config.top_characteristics,
    )?;
    info!("'{}': ユニーク用語 {}件", config.characteristics_field, characteristics.unique_terms);

    let sentiments = normalize_and_count(table, config.sentiment_field, &normalizer, config.top_sentiments)?;
    info!("'{}': ユニーク用語 {}件", config.sentiment_field, sentiments.unique_terms);

    let people_sentiment = relationship(table, config.people_field, config.sentiment_field, &normalizer)?;

    Ok(Report {
        total_records: table.len(),
        people,
        people_co_occurrence,
        characteristics,
        sentiments,
        people_sentiment,
    })
}
