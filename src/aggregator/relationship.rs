//! 2列間のクロス集計
//!
//! 各行の X 列用語 × Y 列用語の直積をすべて数える（位置による対応付けはしない）。

use super::terms::TermNormalizer;
use crate::error::Result;
use crate::table::AnnotatedTable;
use meme_ai_common::FieldId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipCount {
    pub x: String,
    pub y: String,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct RelationshipTable {
    pub column_x: FieldId,
    pub column_y: FieldId,
    pub entries: Vec<RelationshipCount>,
}

impl RelationshipTable {
    pub fn count_of(&self, x: &str, y: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.x == x && e.y == y)
            .map(|e| e.count)
    }
}

/// 全ペアを件数の降順で返す（同数は (x, y) の辞書順）
pub fn relationship(
    table: &AnnotatedTable,
    column_x: FieldId,
    column_y: FieldId,
    normalizer: &TermNormalizer,
) -> Result<RelationshipTable> {
    let xs = table.column(column_x)?;
    let ys = table.column(column_y)?;

    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();

    for (x_cell, y_cell) in xs.zip(ys) {
        let x_terms = normalizer.distinct_terms(x_cell);
        let y_terms = normalizer.distinct_terms(y_cell);

        for x in &x_terms {
            for y in &y_terms {
                *counts.entry((x.clone(), y.clone())).or_insert(0) += 1;
            }
        }
    }

    let mut entries: Vec<RelationshipCount> = counts
        .into_iter()
        .map(|((x, y), count)| RelationshipCount { x, y, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(RelationshipTable {
        column_x,
        column_y,
        entries,
    })
}
