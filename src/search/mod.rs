//! Hybrid passage search.
//!
//! A search runs in five stages:
//!
//! 1. the query is normalized and expanded ([`crate::analysis::QueryRewriter`]);
//! 2. BM25, n-gram and TF-IDF each nominate their best documents
//!    ([`candidates`]);
//! 3. candidates are rescored with a weighted blend plus domain boosts
//!    ([`boost`]);
//! 4. an adaptive threshold trims weak results ([`threshold`]);
//! 5. diversity filters cap results per book and drop near-duplicates
//!    ([`diversity`]).

pub mod boost;
pub mod candidates;
pub mod config;
pub mod diversity;
pub mod document;
pub mod engine;
pub mod threshold;
pub mod types;

pub use self::boost::{BoostCalculator, Boosts};
pub use self::candidates::{CandidatePool, generate_candidates};
pub use self::config::{
    BoostConfig, CandidateConfig, DiversityConfig, ScorerWeights, SearchConfig, ThresholdConfig,
};
pub use self::diversity::DiversityReport;
pub use self::document::{Corpus, CorpusRecord, Document, DocumentMetadata};
pub use self::engine::HybridSearchEngine;
pub use self::threshold::{ThresholdOutcome, median, percentile};
pub use self::types::{BoostKind, ScoreBreakdown, SearchDiagnostics, SearchRequest, SearchResult};
