//! Request and result types for hybrid search.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A boost category that can raise a result's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostKind {
    /// A query word appears in the passage's theme label.
    Theme,
    /// The confession filter matched, fully or partially.
    Confession,
    /// The passage comes from a canonical source.
    Canonical,
}

impl BoostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoostKind::Theme => "theme",
            BoostKind::Confession => "confession",
            BoostKind::Canonical => "canonical",
        }
    }
}

impl fmt::Display for BoostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component scores behind a result, for explainability.
///
/// `bm25`, `tfidf` and `ngram` are raw, unweighted scores; `boosts` is the
/// total of all boosts applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub bm25: f64,
    pub tfidf: f64,
    pub ngram: f64,
    pub boosts: f64,
}

/// A single ranked passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document id from the current fit.
    pub id: usize,
    pub text: String,
    pub book_name: String,
    pub author: String,
    pub confession: String,
    pub theme: String,
    /// Weighted component scores plus boosts.
    pub score: f64,
    pub score_breakdown: ScoreBreakdown,
    /// Boost categories that contributed a nonzero amount, in the order
    /// theme, confession, canonical.
    pub boosts_applied: Vec<BoostKind>,
}

/// Parameters of a single search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Optional confession filter; empty is the same as none.
    pub confession: Option<String>,
    /// Maximum number of results; the engine default when unset.
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new<S: Into<String>>(query: S) -> Self {
        SearchRequest {
            query: query.into(),
            confession: None,
            limit: None,
        }
    }

    /// Set the confession filter.
    pub fn confession<S: Into<String>>(mut self, confession: S) -> Self {
        self.confession = Some(confession.into());
        self
    }

    /// Set the maximum number of results to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// How a search narrowed the corpus down to its results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDiagnostics {
    /// Normalized query words.
    pub main_query: Vec<String>,
    /// Query words after synonym and theme expansion.
    pub expanded_query: Vec<String>,
    /// Documents nominated by BM25, n-gram and TF-IDF respectively.
    pub bm25_nominees: usize,
    pub ngram_nominees: usize,
    pub tfidf_nominees: usize,
    /// Size of the capped candidate union.
    pub candidates: usize,
    /// Adaptive threshold computed over the candidates.
    pub threshold: f64,
    /// Whether too few candidates passed the threshold and the floor was used.
    pub floor_applied: bool,
    /// Results left after the threshold and limit.
    pub after_threshold: usize,
    /// Results left after the per-book cap.
    pub after_book_cap: usize,
    /// Results skipped by the per-book cap.
    pub book_cap_skipped: usize,
    /// Results dropped as near-duplicates of a higher-ranked result.
    pub duplicates_dropped: usize,
    /// Results returned after near-duplicate removal.
    pub returned: usize,
}
