//! 同一画像内の共起

use super::terms::{Tally, TermNormalizer};
use crate::error::Result;
use crate::table::AnnotatedTable;
use meme_ai_common::FieldId;
use std::collections::HashSet;

/// 用語ペアの共起数（first < second）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCount {
    pub first: String,
    pub second: String,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct CoOccurrenceTable {
    pub column: FieldId,
    pub entries: Vec<PairCount>,
}

impl CoOccurrenceTable {
    pub fn count_of(&self, a: &str, b: &str) -> Option<u64> {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        self.entries
            .iter()
            .find(|e| e.first == first && e.second == second)
            .map(|e| e.count)
    }
}

/// 対象用語集合に含まれる用語同士の行内共起を数える
///
/// 各行の用語はソート・重複除去してからペアを作るため、
/// 1行が同じペアに加算するのは高々1回。
pub fn co_occurrence(
    table: &AnnotatedTable,
    column: FieldId,
    restricted: &HashSet<String>,
    normalizer: &TermNormalizer,
    top_n: usize,
) -> Result<CoOccurrenceTable> {
    let mut tally = Tally::new();

    for cell in table.column(column)? {
        let terms: Vec<String> = normalizer
            .distinct_terms(cell)
            .into_iter()
            .filter(|t| restricted.contains(t))
            .collect();

        for (i, first) in terms.iter().enumerate() {
            for second in &terms[i + 1..] {
                tally.add((first.clone(), second.clone()));
            }
        }
    }

    let entries = tally
        .into_ranked()
        .into_iter()
        .take(top_n)
        .map(|((first, second), count)| PairCount { first, second, count })
        .collect();

    Ok(CoOccurrenceTable { column, entries })
}
