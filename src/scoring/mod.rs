//! Relevance scorers.
//!
//! - [`bm25`] - Okapi BM25 over fitted corpus statistics
//! - [`tfidf`] - length-normalized term frequency times `ln(N / df)`
//! - [`ngram`] - weighted character n-gram Jaccard, for fuzzy matches
//! - [`similarity`] - set similarity helpers shared with deduplication
//!
//! Every scorer treats empty text as a zero score rather than an error.

pub mod bm25;
pub mod ngram;
pub mod similarity;
pub mod tfidf;

pub use bm25::{Bm25Config, Bm25Scorer};
pub use ngram::{NgramConfig, NgramScorer};
pub use tfidf::TfIdfScorer;

/// A scorer over word tokens backed by statistics fitted on the corpus.
pub trait TermScorer: Send + Sync {
    /// Score the tokens of document `doc_id` against the query terms.
    fn score(&self, query: &[String], doc_id: usize, doc_tokens: &[String]) -> f64;

    /// Get the name of this scorer.
    fn name(&self) -> &'static str;
}
