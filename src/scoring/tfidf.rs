//! TF-IDF scoring over a fitted corpus.

use ahash::{AHashMap, AHashSet};

use super::TermScorer;

/// TF-IDF scorer.
///
/// Term frequency is the raw count divided by document length; inverse document
/// frequency is `ln(N / df)`, so a term found in every document weighs zero.
#[derive(Debug, Clone, Default)]
pub struct TfIdfScorer {
    /// All distinct corpus terms.
    vocabulary: AHashSet<String>,
    /// Inverse document frequency for each vocabulary term.
    idf: AHashMap<String, f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
}

impl TfIdfScorer {
    /// Create an unfitted scorer.
    pub fn new() -> Self {
        Self::default()
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
        self.n_documents = documents.len();
        self.vocabulary.clear();
        self.idf.clear();

        let mut document_frequency: AHashMap<&str, usize> = AHashMap::new();
        for tokens in documents {
            let unique: AHashSet<&str> = tokens.iter().map(AsRef::as_ref).collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let n = self.n_documents as f64;
        for (term, df) in document_frequency {
            self.vocabulary.insert(term.to_string());
            self.idf.insert(term.to_string(), (n / df as f64).ln());
        }
    }

    /// Inverse document frequency of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether `term` occurs anywhere in the fitted corpus.
    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains(term)
    }

    /// Score `doc_tokens` against `query`. An empty document scores 0.
    pub fn score<S: AsRef<str>, T: AsRef<str>>(&self, query: &[S], doc_tokens: &[T]) -> f64 {
        if doc_tokens.is_empty() {
            return 0.0;
        }

        let doc_len = doc_tokens.len() as f64;
        let counts = term_counts(doc_tokens);

        query
            .iter()
            .filter_map(|term| {
                let term: &str = term.as_ref();
                let idf = self.idf.get(term)?;
                let tf = counts.get(term).copied().unwrap_or(0) as f64 / doc_len;
                Some(tf * idf)
            })
            .fold(0.0, |total, score| total + score)
    }
}

fn term_counts<T: AsRef<str>>(tokens: &[T]) -> AHashMap<&str, usize> {
    let mut counts = AHashMap::new();
    for token in tokens {
        let token: &str = token.as_ref();
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

impl TermScorer for TfIdfScorer {
    fn score(&self, query: &[String], _doc_id: usize, doc_tokens: &[String]) -> f64 {
        TfIdfScorer::score(self, query, doc_tokens)
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}
