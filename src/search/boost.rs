//! Additive domain boosts applied during reranking.

use super::config::SearchConfig;
use super::document::DocumentMetadata;
use super::types::BoostKind;

/// The boosts earned by one document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Boosts {
    pub theme: f64,
    pub confession: f64,
    pub canonical: f64,
}

impl Boosts {
    /// Sum of all boosts.
    pub fn total(&self) -> f64 {
        self.theme + self.confession + self.canonical
    }

    /// Categories that contributed a nonzero amount.
    pub fn applied(&self) -> Vec<BoostKind> {
        [
            (BoostKind::Theme, self.theme),
            (BoostKind::Confession, self.confession),
            (BoostKind::Canonical, self.canonical),
        ]
        .into_iter()
        .filter(|&(_, amount)| amount > 0.0)
        .map(|(kind, _)| kind)
        .collect()
    }
}

/// Computes boosts from the engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct BoostCalculator<'a> {
    config: &'a SearchConfig,
}

impl<'a> BoostCalculator<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    /// All boosts for one document.
    pub fn calculate(
        &self,
        query: &[String],
        confession_filter: Option<&str>,
        metadata: &DocumentMetadata,
    ) -> Boosts {
        Boosts {
            theme: self.theme_boost(query, &metadata.theme),
            confession: self.confession_boost(confession_filter, &metadata.confession),
            canonical: self.canonical_boost(metadata),
        }
    }

    /// `min(cap, per_match * n)` where `n` counts query words found among the
    /// theme label's words.
    pub fn theme_boost(&self, query: &[String], theme: &str) -> f64 {
        let theme = theme.to_lowercase();
        let theme_words: Vec<&str> = theme.split_whitespace().collect();
        if theme_words.is_empty() {
            return 0.0;
        }

        let matches = query
            .iter()
            .filter(|word| theme_words.contains(&word.as_str()))
            .count();
        if matches == 0 {
            return 0.0;
        }

        let boosts = &self.config.boosts;
        boosts.theme_cap.min(boosts.theme_per_match * matches as f64)
    }

    /// Full cap for an exact (case-insensitive) tag match, a partial share for
    /// any other recognized filter, nothing otherwise.
    pub fn confession_boost(&self, filter: Option<&str>, doc_confession: &str) -> f64 {
        let Some(filter) = filter.filter(|f| !f.is_empty()) else {
            return 0.0;
        };

        let boosts = &self.config.boosts;
        if doc_confession.to_lowercase() == filter.to_lowercase() {
            return boosts.confession_cap;
        }

        if self.config.is_known_confession(filter) {
            return boosts.confession_cap * boosts.confession_partial_ratio;
        }

        0.0
    }

    /// Full cap when the book name or author contains a keyword from any
    /// confession's canonical-source list.
    pub fn canonical_boost(&self, metadata: &DocumentMetadata) -> f64 {
        let book_name = metadata.book_name.to_lowercase();
        let author = metadata.author.to_lowercase();

        let canonical = self
            .config
            .canonical_sources
            .values()
            .flatten()
            .map(|keyword| keyword.to_lowercase())
            .any(|keyword| book_name.contains(&keyword) || author.contains(&keyword));

        if canonical {
            self.config.boosts.canonical_cap
        } else {
            0.0
        }
    }
}
