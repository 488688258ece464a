//! 用語の正規化
//!
//! カンマ区切りの自由記述セルを用語（小文字化・句読点除去・前後空白除去）に分解する。

use crate::config::AggregationConfig;
use meme_ai_common::Answer;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

lazy_static::lazy_static! {
    /// ASCII句読点（ハイフン・カンマ以外）
    static ref PUNCTUATION_RE: Regex =
        Regex::new(r##"[!"#$%&'()*+./:;<=>?@\[\\\]^_`{|}~]"##).unwrap();
}

/// セルを用語に分解する
#[derive(Debug, Clone)]
pub struct TermNormalizer {
    ignore_terms: HashSet<String>,
    include_failed_answers: bool,
}

impl TermNormalizer {
    pub fn new<I, S>(ignore_terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ignore_terms: ignore_terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .collect(),
            include_failed_answers: false,
        }
    }

    pub fn from_config(config: &AggregationConfig) -> Self {
        Self::new(&config.ignore_terms).include_failed_answers(config.include_failed_answers)
    }

    /// 失敗回答のセルも分解対象にする
    pub fn include_failed_answers(mut self, include: bool) -> Self {
        self.include_failed_answers = include;
        self
    }

    /// 単一の断片を正規化（無視語・空なら None）
    pub fn normalize(&self, piece: &str) -> Option<String> {
        let stripped = PUNCTUATION_RE.replace_all(piece, "");
        let term = stripped.trim().to_lowercase();
        if term.is_empty() || self.ignore_terms.contains(&term) {
            None
        } else {
            Some(term)
        }
    }

    /// セルの用語（出現順・重複あり）
    pub fn terms(&self, cell: &str) -> Vec<String> {
        if !self.include_failed_answers && Answer::from_cell(cell).is_failure() {
            return Vec::new();
        }

        cell.split(',').filter_map(|piece| self.normalize(piece)).collect()
    }

    /// セルの用語（ソート済み・重複なし）
    pub fn distinct_terms(&self, cell: &str) -> Vec<String> {
        let mut terms = self.terms(cell);
        terms.sort();
        terms.dedup();
        terms
    }
}

/// 表示用: 空白区切りの各単語の先頭を大文字にする
pub fn title_case(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut at_word_start = true;

    for c in term.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// 出現順を保持するカウンタ
#[derive(Debug, Clone)]
pub(crate) struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// 件数の降順（同数は初出順）
    pub fn into_ranked(self) -> Vec<(K, u64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TermNormalizer {
        TermNormalizer::new(["unknown", "none", "no text", "error", ""])
    }

    #[test]
    fn test_terms_basic() {
        let n = normalizer();
        assert_eq!(n.terms("Ion Popescu, unknown, ion popescu"), vec!["ion popescu", "ion popescu"]);
        assert_eq!(n.terms(""), Vec::<String>::new());
        assert_eq!(n.terms("None"), Vec::<String>::new());
    }

    #[test]
    fn test_punctuation_stripped_except_hyphen() {
        let n = normalizer();
        assert_eq!(
            n.terms("'Hand-drawn', (cartoon)!, \"No text\", digital art."),
            vec!["hand-drawn", "cartoon", "digital art"]
        );
        assert_eq!(n.terms("Nicușor Dan; George Simion"), vec!["nicușor dan george simion"]);
    }

    #[test]
    fn test_failed_answers_skipped_by_default() {
        let n = normalizer();
        assert!(n.terms(meme_ai_common::RATE_LIMITED_SENTINEL).is_empty());
        assert!(n.terms("Error: 500 internal").is_empty());

        let n = normalizer().include_failed_answers(true);
        assert_eq!(n.terms("Error: 500 internal"), vec!["error 500 internal"]);
    }

    #[test]
    fn test_answer_text_with_error_prefix_needs_include_failed() {
        // 注釈ステージの失敗セルと同じ形なので既定では除外される
        let cell = "Error: screenshot, cartoon";
        assert!(normalizer().terms(cell).is_empty());

        let n = normalizer().include_failed_answers(true);
        assert_eq!(n.terms(cell), vec!["error screenshot", "cartoon"]);
    }

    #[test]
    fn test_distinct_terms() {
        let n = normalizer();
        assert_eq!(n.distinct_terms("B, A, b, a"), vec!["a", "b"]);
    }

    #[test]
    fn test_ignore_terms_are_normalized() {
        let n = TermNormalizer::new([" Unknown "]);
        assert!(n.terms("UNKNOWN").is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ion popescu"), "Ion Popescu");
        assert_eq!(title_case("hand-drawn"), "Hand-drawn");
        assert_eq!(title_case("nicușor dan"), "Nicușor Dan");
        assert_eq!(title_case("ștefan"), "Ștefan");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_then_normalize_is_identity() {
        let n = normalizer();
        for term in ["ion popescu", "hand-drawn", "digital art", "ștefan"] {
            assert_eq!(n.normalize(&title_case(term)).as_deref(), Some(term));
        }
    }

    #[test]
    fn test_tally_ranked_stable() {
        let mut tally = Tally::new();
        for key in ["b", "a", "c", "a", "c"] {
            tally.add(key);
        }
        assert_eq!(tally.len(), 3);
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.into_ranked(), vec![("a", 2), ("c", 2), ("b", 1)]);
    }
}
