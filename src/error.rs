//! Error types for the Lectio library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`LectioError`] enum. Only a handful of conditions are real errors: searching
//! an engine that was never fitted, fitting an empty corpus, handing `fit`
//! misaligned metadata, and configuration or file-loading problems. Degenerate
//! inputs such as empty queries or empty passages are handled by returning
//! zero scores or empty result lists instead.
//!
//! # Examples
//!
//! ```
//! use lectio::error::{LectioError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LectioError::invalid_config("weights must be non-negative"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lectio operations.
#[derive(Error, Debug)]
pub enum LectioError {
    /// `search` was called before a successful `fit`.
    #[error("Search engine not fitted: call fit() first")]
    NotFitted,

    /// `fit` was called with zero documents.
    #[error("Cannot fit on an empty corpus")]
    EmptyCorpus,

    /// `fit` was called with a metadata sequence not aligned with the documents.
    #[error("Metadata mismatch: {documents} documents but {metadata} metadata records")]
    MetadataMismatch { documents: usize, metadata: usize },

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed corpus, dictionary or configuration input.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors (reading corpus, dictionary or configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LectioError.
pub type Result<T> = std::result::Result<T, LectioError>;

impl LectioError {
    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        LectioError::InvalidConfig(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        LectioError::Parse(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LectioError::Other(msg.into())
    }
}
