//! # Lectio
//!
//! Hybrid lexical search over religious text passages.
//!
//! ## Features
//!
//! - Query normalization with synonym and theme expansion
//! - BM25, TF-IDF and character n-gram scoring
//! - Confession, theme and canonical-source boosts
//! - Adaptive per-query score threshold
//! - Per-book caps and near-duplicate removal
//!
//! ```
//! use lectio::prelude::*;
//!
//! let mut engine = HybridSearchEngine::default();
//! engine
//!     .fit_texts(&["Отче наш, Иже еси на небесех", "Во имя Аллаха, Милостивого"])
//!     .unwrap();
//!
//! let results = engine.search("небесех", None, 5).unwrap();
//! assert_eq!(results[0].id, 0);
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod scoring;
pub mod search;

pub mod prelude {
    pub use crate::analysis::{ExpandedQuery, QueryDictionary, QueryRewriter};
    pub use crate::error::{LectioError, Result};
    pub use crate::search::{
        DocumentMetadata, HybridSearchEngine, SearchConfig, SearchRequest, SearchResult,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
