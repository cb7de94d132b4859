// Word catalog filtering
//
// Two interchangeable strategies sit behind the WordFilter trait:
// - AllowlistFilter: a curated set of short, child-safe words, returned shortest first
// - DictionaryFilter: a general word list, returned in random order
//
// A deployment picks exactly one. They produce different words for the same query,
// so the choice is surfaced in configuration and logged at startup.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Curated words grouped by the phonics pattern they teach
pub const SIMPLE_WORD_ALLOWLIST: &[&str] = &[
    // ch
    "chip", "chat", "chop", "chin", "chug", "check", "rich", "much",
    // sh
    "ship", "shop", "shed", "shoe", "fish", "dish", "wish", "dash", "shut",
    // th
    "this", "that", "thin", "with", "moth", "bath", "path", "math",
    // at
    "cat", "bat", "rat", "hat", "mat", "fat", "sat", "pat",
    // ig
    "pig", "big", "dig", "wig", "fig", "jig", "rig",
];

/// Shortest and longest word kept from a dictionary file
pub const DICTIONARY_MIN_LEN: usize = 3;
pub const DICTIONARY_MAX_LEN: usize = 8;

/// Default pattern and limit for word queries
pub const DEFAULT_PATTERN: &str = "ch";
pub const DEFAULT_LIMIT: usize = 5;

/// Selects words containing a phonics pattern.
///
/// Implementations must return distinct words, each containing `pattern`
/// case-insensitively, and at most `limit` of them.
pub trait WordFilter: Send + Sync {
    fn find(&self, pattern: &str, limit: usize) -> Vec<String>;

    /// Which strategy this filter implements
    fn strategy(&self) -> WordFilterStrategy;

    /// Number of words in the catalog
    fn catalog_size(&self) -> usize;
}

/// Catalog and ordering policy used to answer word queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordFilterStrategy {
    /// Curated allowlist, shortest words first
    #[default]
    Allowlist,
    /// Dictionary file, random order
    Dictionary,
}

impl WordFilterStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordFilterStrategy::Allowlist => "allowlist",
            WordFilterStrategy::Dictionary => "dictionary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "allowlist" => Some(WordFilterStrategy::Allowlist),
            "dictionary" => Some(WordFilterStrategy::Dictionary),
            _ => None,
        }
    }
}

/// Curated allowlist filter
#[derive(Debug, Clone)]
pub struct AllowlistFilter {
    words: BTreeSet<String>,
}

impl AllowlistFilter {
    /// Filter over the built-in allowlist
    pub fn new() -> Self {
        Self::with_words(SIMPLE_WORD_ALLOWLIST.iter().copied())
    }

    /// Filter over a custom list of words (lowercased on load)
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

impl Default for AllowlistFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl WordFilter for AllowlistFilter {
    fn find(&self, pattern: &str, limit: usize) -> Vec<String> {
        let pattern = pattern.to_lowercase();

        // BTreeSet iteration is alphabetical, so the stable sort below breaks
        // length ties alphabetically.
        let mut matches: Vec<String> = self
            .words
            .iter()
            .filter(|w| w.contains(&pattern))
            .cloned()
            .collect();

        matches.sort_by_key(|w| w.chars().count());
        matches.truncate(limit);
        matches
    }

    fn strategy(&self) -> WordFilterStrategy {
        WordFilterStrategy::Allowlist
    }

    fn catalog_size(&self) -> usize {
        self.words.len()
    }
}

/// Dictionary-backed filter with randomized ordering
#[derive(Debug, Clone)]
pub struct DictionaryFilter {
    words: Vec<String>,
}

impl DictionaryFilter {
    /// Build from raw dictionary entries.
    ///
    /// Entries are lowercased; only alphabetic words of 3 to 8 characters are
    /// kept, and duplicates (e.g. "Bath" and "bath") collapse to one.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| is_dictionary_word(w))
            .collect();

        Self {
            words: words.into_iter().collect(),
        }
    }

    /// Load a newline-separated word list
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;

        let filter = Self::from_words(contents.lines());
        tracing::debug!(
            path = %path.display(),
            words = filter.words.len(),
            "Loaded dictionary word list"
        );
        Ok(filter)
    }
}

fn is_dictionary_word(word: &str) -> bool {
    let len = word.chars().count();
    (DICTIONARY_MIN_LEN..=DICTIONARY_MAX_LEN).contains(&len)
        && word.chars().all(char::is_alphabetic)
}

impl WordFilter for DictionaryFilter {
    fn find(&self, pattern: &str, limit: usize) -> Vec<String> {
        let pattern = pattern.to_lowercase();

        // Catalog entries are already unique and lowercase
        let mut matches: Vec<String> = self
            .words
            .iter()
            .filter(|w| w.contains(&pattern))
            .cloned()
            .collect();

        matches.shuffle(&mut rand::thread_rng());
        matches.truncate(limit);
        matches
    }

    fn strategy(&self) -> WordFilterStrategy {
        WordFilterStrategy::Dictionary
    }

    fn catalog_size(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    fn assert_valid_result(words: &[String], pattern: &str, limit: usize) {
        assert!(words.len() <= limit, "{} words over limit {}", words.len(), limit);
        let unique: HashSet<&String> = words.iter().collect();
        assert_eq!(unique.len(), words.len(), "duplicates in {:?}", words);
        for w in words {
            assert!(
                w.to_lowercase().contains(&pattern.to_lowercase()),
                "{} does not contain {}",
                w,
                pattern
            );
        }
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            WordFilterStrategy::from_str("allowlist"),
            Some(WordFilterStrategy::Allowlist)
        );
        assert_eq!(
            WordFilterStrategy::from_str(" DICTIONARY "),
            Some(WordFilterStrategy::Dictionary)
        );
        assert_eq!(WordFilterStrategy::from_str("nltk"), None);
        assert_eq!(WordFilterStrategy::Dictionary.as_str(), "dictionary");
    }

    #[test]
    fn test_allowlist_ch_limit_three() {
        let filter = AllowlistFilter::new();
        let words = filter.find("ch", 3);

        assert_eq!(words.len(), 3);
        assert_valid_result(&words, "ch", 3);
        // All four-letter "ch" words sort before "check"; alphabetical within a length
        assert_eq!(words, vec!["chat", "chin", "chip"]);
    }

    #[test]
    fn test_allowlist_sorted_shortest_first() {
        let filter = AllowlistFilter::new();
        for pattern in ["", "a", "h", "i", "sh", "th", "at"] {
            let words = filter.find(pattern, 100);
            assert_valid_result(&words, pattern, 100);
            for pair in words.windows(2) {
                assert!(
                    pair[0].len() <= pair[1].len(),
                    "{:?} not length ordered",
                    words
                );
            }
        }
    }

    #[test]
    fn test_allowlist_case_insensitive() {
        let filter = AllowlistFilter::new();
        assert_eq!(filter.find("SH", 10), filter.find("sh", 10));
    }

    #[test]
    fn test_allowlist_fewer_matches_than_limit() {
        let filter = AllowlistFilter::new();
        let words = filter.find("ig", 50);
        assert_eq!(words.len(), 7);
        assert_valid_result(&words, "ig", 50);
    }

    #[test]
    fn test_allowlist_no_match_and_zero_limit() {
        let filter = AllowlistFilter::new();
        assert!(filter.find("zz", 5).is_empty());
        assert!(filter.find("ch", 0).is_empty());
    }

    #[test]
    fn test_allowlist_is_deterministic() {
        let filter = AllowlistFilter::new();
        let first = filter.find("a", 8);
        for _ in 0..10 {
            assert_eq!(filter.find("a", 8), first);
        }
    }

    #[test]
    fn test_allowlist_custom_words_are_normalized() {
        let filter = AllowlistFilter::with_words(["Chat", "chat", " CHIN ", ""]);
        assert_eq!(filter.catalog_size(), 2);
        assert_eq!(filter.find("ch", 5), vec!["chat", "chin"]);
    }

    #[test]
    fn test_allowlist_catalog_size() {
        let filter = AllowlistFilter::new();
        assert_eq!(filter.catalog_size(), SIMPLE_WORD_ALLOWLIST.len());
        assert_eq!(filter.strategy(), WordFilterStrategy::Allowlist);
    }

    #[test]
    fn test_dictionary_prefilters_entries() {
        let filter = DictionaryFilter::from_words([
            "Chat", "chat", "ch", "chocolates", "it's", "Ranch", "chapters", "über",
        ]);
        // "ch" too short, "chocolates" too long, "it's" not alphabetic
        assert_eq!(filter.catalog_size(), 4);

        let mut words = filter.find("CH", 10);
        words.sort();
        assert_eq!(words, vec!["chapters", "chat", "ranch"]);
    }

    #[test]
    fn test_dictionary_same_set_across_calls() {
        let filter = DictionaryFilter::from_words(["much", "such", "chin", "rich", "ship"]);

        let mut first = filter.find("ch", 10);
        first.sort();
        for _ in 0..10 {
            let mut again = filter.find("ch", 10);
            assert_valid_result(&again, "ch", 10);
            again.sort();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_dictionary_truncates_to_limit() {
        let filter = DictionaryFilter::from_words(["much", "such", "chin", "rich", "chop"]);
        let words = filter.find("ch", 2);
        assert_eq!(words.len(), 2);
        assert_valid_result(&words, "ch", 2);
    }

    #[test]
    fn test_dictionary_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Aachen\nbath\nBATH\nmath's\npath").unwrap();

        let filter = DictionaryFilter::from_file(file.path()).unwrap();
        assert_eq!(filter.strategy(), WordFilterStrategy::Dictionary);
        assert_eq!(filter.catalog_size(), 3);

        let mut words = filter.find("ath", 10);
        words.sort();
        assert_eq!(words, vec!["bath", "path"]);
    }

    #[test]
    fn test_dictionary_missing_file() {
        let result = DictionaryFilter::from_file("/definitely/not/here/words");
        assert!(result.is_err());
    }
}
