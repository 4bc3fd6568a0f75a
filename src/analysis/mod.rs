//! Text analysis for Lectio.
//!
//! Queries and passages share one normalizer so their word tokens line up;
//! queries additionally pass through the rewriter, which expands them with
//! synonyms and theme words from a static dictionary.

pub mod dictionary;
pub mod normalizer;
pub mod rewriter;

// Re-export commonly used types
pub use dictionary::QueryDictionary;
pub use normalizer::TextNormalizer;
pub use rewriter::{ExpandedQuery, QueryRewriter};
