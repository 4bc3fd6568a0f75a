//! Character n-gram scoring for fuzzy matching.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use super::similarity::{compensated_sum, jaccard};
use crate::error::{LectioError, Result};

/// Gram sizes and their blend weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgramConfig {
    /// Character gram lengths, each at least 1.
    pub lengths: Vec<usize>,
    /// Blend weight of each length, positionally aligned with `lengths`.
    pub weights: Vec<f64>,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            lengths: vec![3, 4, 5],
            weights: vec![0.6, 0.3, 0.1],
        }
    }
}

impl NgramConfig {
    /// Check that lengths and weights line up and are usable.
    pub fn validate(&self) -> Result<()> {
        if self.lengths.len() != self.weights.len() {
            return Err(LectioError::invalid_config(format!(
                "ngram lengths ({}) and weights ({}) must have the same size",
                self.lengths.len(),
                self.weights.len()
            )));
        }
        if self.lengths.contains(&0) {
            return Err(LectioError::invalid_config(
                "ngram lengths must be at least 1",
            ));
        }
        if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(LectioError::invalid_config(
                "ngram weights must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// A scorer comparing the character n-grams of two strings.
///
/// For each configured length the grams of both strings are compared with
/// Jaccard similarity, and the per-length similarities are blended with the
/// configured weights. Morphological variants and typos still share most of
/// their short grams, so they keep a good part of the score.
///
/// # Examples
///
/// ```
/// use lectio::scoring::ngram::NgramScorer;
///
/// let scorer = NgramScorer::new();
/// assert_eq!(scorer.score("abc", "abc"), 1.0);
/// assert!(scorer.score("prayer", "prayers") > scorer.score("prayer", "river"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NgramScorer {
    config: NgramConfig,
}

impl NgramScorer {
    /// Create a scorer with lengths 3, 4 and 5 weighted 0.6, 0.3 and 0.1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom lengths and weights.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths and weights differ in size, a length is
    /// 0, or a weight is negative.
    pub fn with_config(config: NgramConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configured lengths and weights.
    pub fn config(&self) -> &NgramConfig {
        &self.config
    }

    /// All distinct substrings of `n` characters.
    ///
    /// Text shorter than `n` characters is its own single gram.
    pub fn get_ngrams(text: &str, n: usize) -> AHashSet<String> {
        if n == 0 {
            return AHashSet::new();
        }

        let chars: Vec<char> = text.chars().collect();
        if chars.len() < n {
            return std::iter::once(text.to_string()).collect();
        }

        chars
            .windows(n)
            .map(|window| window.iter().collect())
            .collect()
    }

    /// Weighted n-gram similarity of `query` and `text`. Empty input scores 0.
    pub fn score(&self, query: &str, text: &str) -> f64 {
        if query.is_empty() || text.is_empty() {
            return 0.0;
        }

        compensated_sum(
            self.config
                .lengths
                .iter()
                .zip(&self.config.weights)
                .map(|(&n, &weight)| {
                    let query_grams = Self::get_ngrams(query, n);
                    let text_grams = Self::get_ngrams(text, n);
                    jaccard(&query_grams, &text_grams) * weight
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ngrams() {
        let grams = NgramScorer::get_ngrams("hello", 3);
        assert_eq!(grams.len(), 3);
        assert!(grams.contains("hel"));
        assert!(grams.contains("ell"));
        assert!(grams.contains("llo"));

        // repeated grams collapse
        assert_eq!(NgramScorer::get_ngrams("aaaa", 2).len(), 1);
    }

    #[test]
    fn test_get_ngrams_short_text() {
        let grams = NgramScorer::get_ngrams("ab", 3);
        assert_eq!(grams.len(), 1);
        assert!(grams.contains("ab"));

        let grams = NgramScorer::get_ngrams("", 3);
        assert!(grams.contains(""));
    }

    #[test]
    fn test_get_ngrams_unicode() {
        let grams = NgramScorer::get_ngrams("храм", 3);
        assert_eq!(grams.len(), 2);
        assert!(grams.contains("хра"));
        assert!(grams.contains("рам"));
    }

    #[test]
    fn test_identical_short_strings() {
        assert_eq!(NgramScorer::new().score("abc", "abc"), 1.0);
    }

    #[test]
    fn test_identical_long_strings() {
        let scorer = NgramScorer::new();
        assert!((scorer.score("the cat sat", "the cat sat") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap() {
        let scorer = NgramScorer::new();
        let close = scorer.score("praying", "prayer");
        let far = scorer.score("praying", "mountain");

        assert!(close > 0.0);
        assert!(close < 1.0);
        assert_eq!(far, 0.0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let scorer = NgramScorer::new();
        assert_eq!(scorer.score("", ""), 0.0);
        assert_eq!(scorer.score("", "abc"), 0.0);
        assert_eq!(scorer.score("abc", ""), 0.0);
    }

    #[test]
    fn test_custom_config() {
        let scorer = NgramScorer::with_config(NgramConfig {
            lengths: vec![2],
            weights: vec![1.0],
        })
        .unwrap();
        // {ab, bc} vs {ab, bd}: 1 shared of 3
        assert!((scorer.score("abc", "abd") - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config() {
        assert!(
            NgramScorer::with_config(NgramConfig {
                lengths: vec![3, 4],
                weights: vec![1.0],
            })
            .is_err()
        );
        assert!(
            NgramScorer::with_config(NgramConfig {
                lengths: vec![0],
                weights: vec![1.0],
            })
            .is_err()
        );
        assert!(
            NgramScorer::with_config(NgramConfig {
                lengths: vec![3],
                weights: vec![-0.5],
            })
            .is_err()
        );
    }
}
