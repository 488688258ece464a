//! 用語の出現頻度

use super::terms::{Tally, TermNormalizer};
use crate::error::Result;
use crate::table::AnnotatedTable;
use meme_ai_common::FieldId;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// 上位N件の頻度表
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    pub column: FieldId,
    pub entries: Vec<TermCount>,
    /// 切り詰め前のユニーク用語数
    pub unique_terms: usize,
    /// 切り詰め前の（行, 用語）出現数の合計
    pub total_occurrences: u64,
}

impl FrequencyTable {
    /// 上位k件の用語集合
    pub fn top_terms(&self, k: usize) -> HashSet<String> {
        self.entries.iter().take(k).map(|e| e.term.clone()).collect()
    }

    pub fn count_of(&self, term: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.term == term).map(|e| e.count)
    }
}

/// 列の用語を数え、件数の多い順に上位 `top_n` 件を返す
pub fn normalize_and_count(
    table: &AnnotatedTable,
    column: FieldId,
    normalizer: &TermNormalizer,
    top_n: usize,
) -> Result<FrequencyTable> {
    let mut tally = Tally::new();

    for cell in table.column(column)? {
        for term in normalizer.terms(cell) {
            tally.add(term);
        }
    }

    let unique_terms = tally.len();
    let total_occurrences = tally.total();
    let entries = tally
        .into_ranked()
        .into_iter()
        .take(top_n)
        .map(|(term, count)| TermCount { term, count })
        .collect();

    Ok(FrequencyTable {
        column,
        entries,
        unique_terms,
        total_occurrences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::title_case;
    use crate::error::MemeAiError;

    fn table(people: &[&str]) -> AnnotatedTable {
        AnnotatedTable::new(
            "test.csv",
            vec!["file_name".into(), "who_is_in_images".into()],
            people
                .iter()
                .enumerate()
                .map(|(i, p)| vec![format!("{}.png", i), p.to_string()])
                .collect(),
        )
    }

    fn normalizer() -> TermNormalizer {
        TermNormalizer::new(["unknown", "none", "no text", "error", ""])
    }

    #[test]
    fn test_duplicate_mentions_counted() {
        let t = table(&["Ion Popescu, unknown, ion popescu"]);
        let freq = normalize_and_count(&t, FieldId::WhoIsInImages, &normalizer(), 50).unwrap();

        assert_eq!(freq.count_of("ion popescu"), Some(2));
        assert_eq!(freq.count_of("unknown"), None);
        assert_eq!(freq.unique_terms, 1);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let t = table(&["Maria, Ion", "Ion, Vasile, Maria", "Ana"]);
        let freq = normalize_and_count(&t, FieldId::WhoIsInImages, &normalizer(), 3).unwrap();

        let terms: Vec<_> = freq.entries.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["maria", "ion", "vasile"]);
        assert_eq!(freq.unique_terms, 4);
    }

    #[test]
    fn test_total_occurrences_matches_extracted_terms() {
        let cells = ["Ion, unknown", "Ion, Maria", "Maria", "", "None, Ana, ana"];
        let t = table(&cells);
        let n = normalizer();
        let freq = normalize_and_count(&t, FieldId::WhoIsInImages, &n, 100).unwrap();

        let extracted: usize = cells.iter().map(|c| n.terms(c).len()).sum();
        let sum: u64 = freq.entries.iter().map(|e| e.count).sum();
        assert_eq!(freq.total_occurrences, extracted as u64);
        assert_eq!(sum, freq.total_occurrences);
    }

    #[test]
    fn test_recount_on_rendered_terms_is_stable() {
        let t = table(&["Ion, unknown", "Ion, Maria", "Maria, Hand-Drawn"]);
        let n = normalizer();
        let first = normalize_and_count(&t, FieldId::WhoIsInImages, &n, 10).unwrap();

        // 表示形式（Title Case）に戻したセルで再集計
        let rendered: Vec<String> = first
            .entries
            .iter()
            .flat_map(|e| std::iter::repeat(title_case(&e.term)).take(e.count as usize))
            .collect();
        let cells: Vec<&str> = rendered.iter().map(String::as_str).collect();
        let second = normalize_and_count(&table(&cells), FieldId::WhoIsInImages, &n, 10).unwrap();

        assert_eq!(first.entries, second.entries);
    }

    #[test]
    fn test_missing_column() {
        let t = table(&["Ion"]);
        let result = normalize_and_count(&t, FieldId::VisualSentiment, &normalizer(), 5);
        assert!(matches!(result, Err(MemeAiError::MissingColumn { .. })));
    }

    #[test]
    fn test_top_terms() {
        let t = table(&["A, B, C", "A, B", "A"]);
        let freq = normalize_and_count(&t, FieldId::WhoIsInImages, &normalizer(), 50).unwrap();
        let top = freq.top_terms(2);
        assert!(top.contains("a") && top.contains("b") && !top.contains("c"));
    }
}
