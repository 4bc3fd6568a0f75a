//! Query rewriting: normalization plus synonym and theme expansion.

use ahash::AHashSet;
use log::debug;
use serde::{Deserialize, Serialize};

use super::dictionary::QueryDictionary;
use super::normalizer::TextNormalizer;

/// A query after rewriting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandedQuery {
    /// Main words plus every synonym and theme word, without duplicates.
    ///
    /// Main words come first in query order, then synonyms, then theme words,
    /// each in table order.
    pub expanded: Vec<String>,
    /// The normalized words of the raw query.
    pub main: Vec<String>,
}

impl ExpandedQuery {
    /// True when the query normalized to nothing.
    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    /// The expanded words joined with single spaces, as fed to the n-gram scorer.
    pub fn joined(&self) -> String {
        self.expanded.join(" ")
    }
}

/// Normalizes raw queries and expands them from a [`QueryDictionary`].
#[derive(Debug, Clone, Default)]
pub struct QueryRewriter {
    normalizer: TextNormalizer,
    dictionary: QueryDictionary,
}

impl QueryRewriter {
    /// Create a rewriter over the given dictionary.
    pub fn new(dictionary: QueryDictionary) -> Self {
        Self {
            normalizer: TextNormalizer::default(),
            dictionary,
        }
    }

    /// The dictionary in use.
    pub fn dictionary(&self) -> &QueryDictionary {
        &self.dictionary
    }

    /// The normalizer shared with passage processing.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Lowercase, strip punctuation and collapse whitespace.
    pub fn normalize_text(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Rewrite `query` into its main words and its expanded word set.
    pub fn expand_query(&self, query: &str) -> ExpandedQuery {
        let main = self.normalizer.tokenize(query);

        let synonyms: Vec<&String> = main
            .iter()
            .filter_map(|word| self.dictionary.get_synonyms(word))
            .flatten()
            .collect();
        let themes: Vec<&String> = main
            .iter()
            .filter_map(|word| self.dictionary.get_themes(word))
            .flatten()
            .collect();

        let mut seen = AHashSet::new();
        let expanded: Vec<String> = main
            .iter()
            .chain(synonyms.iter().copied())
            .chain(themes.iter().copied())
            .filter(|word| seen.insert(word.as_str()))
            .cloned()
            .collect();

        debug!(
            "Query expansion: '{}' -> main: {:?}, synonyms: {:?}, themes: {:?}",
            query, main, synonyms, themes
        );

        ExpandedQuery { expanded, main }
    }
}
