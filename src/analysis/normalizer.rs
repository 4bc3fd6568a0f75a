//! Text normalization shared by queries and passages.

use std::sync::Arc;

use regex::Regex;

use crate::error::{LectioError, Result};

/// Lowercases text, blanks out punctuation and collapses whitespace.
///
/// Every character that is neither a word character nor whitespace becomes a
/// space, then runs of whitespace collapse to a single space and the result is
/// trimmed. Queries and passages go through the same normalizer so their tokens
/// line up.
///
/// # Examples
///
/// ```
/// use lectio::analysis::normalizer::TextNormalizer;
///
/// let normalizer = TextNormalizer::new().unwrap();
/// assert_eq!(normalizer.normalize("Hello,   World!"), "hello world");
/// assert_eq!(normalizer.tokenize("Свет миру."), vec!["свет", "миру"]);
/// ```
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    /// Matches anything that is neither a word character nor whitespace
    punctuation: Arc<Regex>,
    /// Matches runs of whitespace
    whitespace: Arc<Regex>,
}

impl TextNormalizer {
    /// Create a normalizer with the standard punctuation and whitespace patterns.
    pub fn new() -> Result<Self> {
        let punctuation = Regex::new(r"[^\w\s]")
            .map_err(|e| LectioError::other(format!("Invalid regex pattern: {e}")))?;
        let whitespace = Regex::new(r"\s+")
            .map_err(|e| LectioError::other(format!("Invalid regex pattern: {e}")))?;

        Ok(TextNormalizer {
            punctuation: Arc::new(punctuation),
            whitespace: Arc::new(whitespace),
        })
    }

    /// Normalize a piece of text.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let blanked = self.punctuation.replace_all(&lowered, " ");
        self.whitespace.replace_all(&blanked, " ").trim().to_string()
    }

    /// Normalize a piece of text and split it into word tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("Default normalizer patterns should be valid")
    }
}
