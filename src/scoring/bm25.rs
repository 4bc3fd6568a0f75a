//! Okapi BM25 scoring over a fitted corpus.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::TermScorer;

/// BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Config {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Document-length normalization strength, in `[0, 1]`.
    pub b: f64,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

/// BM25 scorer implementation.
///
/// `fit` records per-document lengths and per-term document frequencies, then
/// precomputes `idf[t] = ln((N - df + 0.5) / (df + 0.5))`. The idf goes
/// negative for terms present in more than half the corpus; it is used as is.
#[derive(Debug, Clone, Default)]
pub struct Bm25Scorer {
    config: Bm25Config,
    /// Number of documents containing each term.
    doc_freq: AHashMap<String, usize>,
    /// Inverse document frequency for each corpus term.
    idf: AHashMap<String, f64>,
    /// Token count of each document, indexed by document id.
    doc_len: Vec<usize>,
    /// Mean of `doc_len`.
    avg_doc_len: f64,
}

impl Bm25Scorer {
    /// Create a new BM25 scorer with the default parameters.
    pub fn new() -> Self {
        Self::with_config(Bm25Config::default())
    }

    /// Create a new BM25 scorer with custom parameters.
    pub fn with_config(config: Bm25Config) -> Self {
        Bm25Scorer {
            config,
            ..Default::default()
        }
    }

    /// Get the k1 parameter.
    pub fn k1(&self) -> f64 {
        self.config.k1
    }

    /// Get the b parameter.
    pub fn b(&self) -> f64 {
        self.config.b
    }

    /// Fit on normalized documents, split on whitespace.
    ///
    /// Replaces any statistics from a previous fit.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        let tokenized: Vec<Vec<&str>> = documents
            .iter()
            .map(|doc| doc.as_ref().split_whitespace().collect())
            .collect();
        self.fit_tokens(&tokenized);
    }

    /// Fit on pre-tokenized documents.
    pub fn fit_tokens<S: AsRef<str>>(&mut self, documents: &[Vec<S>]) {
        self.doc_freq.clear();
        self.idf.clear();
        self.doc_len = documents.iter().map(Vec::len).collect();

        for tokens in documents {
            let mut unique: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
            unique.sort_unstable();
            unique.dedup();
            for term in unique {
                *self.doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        self.avg_doc_len = if documents.is_empty() {
            0.0
        } else {
            self.doc_len.iter().sum::<usize>() as f64 / n
        };

        for (term, &df) in &self.doc_freq {
            let df = df as f64;
            self.idf
                .insert(term.clone(), ((n - df + 0.5) / (df + 0.5)).ln());
        }
    }

    /// Inverse document frequency of `term`, if it occurs in the corpus.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Number of documents containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// Mean document length of the fitted corpus.
    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    /// Number of documents in the fitted corpus.
    pub fn corpus_size(&self) -> usize {
        self.doc_len.len()
    }

    /// Number of distinct terms in the fitted corpus.
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Score `doc_tokens` (the tokens of document `doc_id`) against `query`.
    ///
    /// Query terms absent from the corpus contribute nothing, and so does an
    /// unknown `doc_id`.
    pub fn score<S: AsRef<str>, T: AsRef<str>>(
        &self,
        query: &[S],
        doc_id: usize,
        doc_tokens: &[T],
    ) -> f64 {
        let Some(&doc_len) = self.doc_len.get(doc_id) else {
            return 0.0;
        };

        let length_ratio = if self.avg_doc_len > 0.0 {
            doc_len as f64 / self.avg_doc_len
        } else {
            0.0
        };
        let k1 = self.config.k1;
        let norm = k1 * (1.0 - self.config.b + self.config.b * length_ratio);

        query
            .iter()
            .filter_map(|term| {
                let term: &str = term.as_ref();
                let idf = self.idf.get(term)?;
                let tf = term_count(doc_tokens, term) as f64;
                if tf == 0.0 {
                    return None;
                }
                Some(idf * tf * (k1 + 1.0) / (tf + norm))
            })
            .fold(0.0, |total, score| total + score)
    }
}

/// Raw count of `term` in `tokens`.
fn term_count<T: AsRef<str>>(tokens: &[T], term: &str) -> usize {
    tokens
        .iter()
        .filter(|token| {
            let token: &str = (*token).as_ref();
            token == term
        })
        .count()
}

impl TermScorer for Bm25Scorer {
    fn score(&self, query: &[String], doc_id: usize, doc_tokens: &[String]) -> f64 {
        Bm25Scorer::score(self, query, doc_id, doc_tokens)
    }

    fn name(&self) -> &'static str {
        "bm25"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bm25_scorer_creation() {
        let scorer = Bm25Scorer::new();
        assert_eq!(scorer.k1(), 1.2);
        assert_eq!(scorer.b(), 0.75);
        assert_eq!(scorer.corpus_size(), 0);

        let scorer = Bm25Scorer::with_config(Bm25Config { k1: 1.5, b: 0.8 });
        assert_eq!(scorer.k1(), 1.5);
        assert_eq!(scorer.b(), 0.8);
    }

    #[test]
    fn test_fit_statistics() {
        let mut scorer = Bm25Scorer::new();
        scorer.fit(&["a b a", "b c"]);

        assert_eq!(scorer.corpus_size(), 2);
        assert_eq!(scorer.vocabulary_size(), 3);
        assert_eq!(scorer.doc_freq("a"), 1);
        assert_eq!(scorer.doc_freq("b"), 2);
        assert!((scorer.avg_doc_len() - 2.5).abs() < 1e-12);
        assert!((scorer.idf("b").unwrap() - (0.5_f64 / 2.5).ln()).abs() < 1e-12);
        assert!(scorer.idf("z").is_none());
    }

    #[test]
    fn test_score_matches_closed_form() {
        let mut scorer = Bm25Scorer::new();
        scorer.fit(&["a b a", "b c"]);

        let (n, df, tf, doc_len, avg_len) = (2.0_f64, 1.0_f64, 2.0_f64, 3.0_f64, 2.5_f64);
        let (k1, b) = (1.2_f64, 0.75_f64);
        let idf = ((n - df + 0.5) / (df + 0.5)).ln();
        let expected = idf * tf * (k1 + 1.0) / (tf + k1 * (1.0 - b + b * doc_len / avg_len));

        let score = scorer.score(&["a"], 0, &["a", "b", "a"]);
        assert!((score - expected).abs() < 1e-6);
    }

    #[test]
    fn test_score_rewards_rare_terms() {
        let mut scorer = Bm25Scorer::new();
        scorer.fit(&["apple pie", "apple tart", "banana bread", "cherry jam", "plum cake"]);

        let score = scorer.score(&["banana"], 2, &["banana", "bread"]);
        assert!(score > 0.0);
        assert_eq!(scorer.score(&["banana"], 0, &["apple", "pie"]), 0.0);
    }

    #[test]
    fn test_score_degenerate_inputs() {
        let mut scorer = Bm25Scorer::new();
        scorer.fit(&["", "x"]);

        let empty: [&str; 0] = [];
        assert_eq!(scorer.score(&empty, 1, &["x"]), 0.0);
        assert_eq!(scorer.score(&["x"], 0, &empty), 0.0);
        assert_eq!(scorer.score(&["unknown"], 1, &["x"]), 0.0);
        assert_eq!(scorer.score(&["x"], 99, &["x"]), 0.0);
    }

    #[test]
    fn test_no_matching_terms_scores_positive_zero() {
        let mut scorer = Bm25Scorer::new();
        scorer.fit(&["cat food recipes", "dog training tips"]);

        let score = scorer.score(&["bird"], 0, &["cat", "food", "recipes"]);
        assert_eq!(score, 0.0);
        assert!(score.is_sign_positive());

        let score = scorer.score(&["dog"], 0, &["cat", "food", "recipes"]);
        assert!(score.is_sign_positive());
    }

    #[test]
    fn test_refit_replaces_statistics() {
        let mut scorer = Bm25Scorer::new();
        scorer.fit(&["alpha beta", "gamma"]);
        scorer.fit(&["delta"]);

        assert_eq!(scorer.corpus_size(), 1);
        assert!(scorer.idf("alpha").is_none());
        assert_eq!(scorer.doc_freq("delta"), 1);
    }
}
