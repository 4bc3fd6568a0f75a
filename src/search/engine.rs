//! The hybrid search engine.

use log::{info, warn};

use super::boost::BoostCalculator;
use super::candidates::generate_candidates;
use super::config::SearchConfig;
use super::diversity::apply_diversity_filters;
use super::document::{Corpus, Document, DocumentMetadata};
use super::threshold::apply_adaptive_threshold;
use super::types::{ScoreBreakdown, SearchDiagnostics, SearchRequest, SearchResult};
use crate::analysis::{ExpandedQuery, QueryDictionary, QueryRewriter};
use crate::error::{LectioError, Result};
use crate::scoring::{Bm25Scorer, NgramScorer, TfIdfScorer};

/// Lexical hybrid search over an in-memory passage corpus.
///
/// An engine starts unfitted. [`fit`](Self::fit) replaces the corpus and all
/// corpus statistics; [`search`](Self::search) only reads them, so a fitted
/// engine can be shared across threads behind a plain reference.
///
/// # Examples
///
/// ```
/// use lectio::search::{DocumentMetadata, HybridSearchEngine};
///
/// let mut engine = HybridSearchEngine::default();
/// engine
///     .fit(
///         &["the cat sat on the mat", "dogs bark at night"],
///         &[DocumentMetadata::default(), DocumentMetadata::default()],
///     )
///     .unwrap();
///
/// let results = engine.search("cat", None, 10).unwrap();
/// assert_eq!(results[0].id, 0);
/// ```
#[derive(Debug, Clone)]
pub struct HybridSearchEngine {
    config: SearchConfig,
    rewriter: QueryRewriter,
    bm25: Bm25Scorer,
    tfidf: TfIdfScorer,
    ngram: NgramScorer,
    /// Empty until the first successful fit.
    documents: Vec<Document>,
}

impl Default for HybridSearchEngine {
    fn default() -> Self {
        let config = SearchConfig::default();
        Self {
            bm25: Bm25Scorer::with_config(config.bm25),
            ngram: NgramScorer::new(),
            tfidf: TfIdfScorer::new(),
            rewriter: QueryRewriter::default(),
            documents: Vec::new(),
            config,
        }
    }
}

impl HybridSearchEngine {
    /// Create an engine with the default dictionary.
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_dictionary(config, QueryDictionary::default())
    }

    /// Create an engine with a custom synonym and theme dictionary.
    pub fn with_dictionary(config: SearchConfig, dictionary: QueryDictionary) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            bm25: Bm25Scorer::with_config(config.bm25),
            ngram: NgramScorer::with_config(config.ngram.clone())?,
            tfidf: TfIdfScorer::new(),
            rewriter: QueryRewriter::new(dictionary),
            documents: Vec::new(),
            config,
        })
    }

    /// Fit on `documents` with positionally aligned `metadata`.
    ///
    /// Document ids are positions in `documents`. On error the engine keeps
    /// whatever it was fitted on before.
    pub fn fit<S: AsRef<str>>(
        &mut self,
        documents: &[S],
        metadata: &[DocumentMetadata],
    ) -> Result<()> {
        if documents.is_empty() {
            return Err(LectioError::EmptyCorpus);
        }
        if documents.len() != metadata.len() {
            return Err(LectioError::MetadataMismatch {
                documents: documents.len(),
                metadata: metadata.len(),
            });
        }

        let fitted: Vec<Document> = documents
            .iter()
            .zip(metadata)
            .enumerate()
            .map(|(id, (text, meta))| {
                let text = text.as_ref();
                let normalized = self.rewriter.normalize_text(text);
                Document::new(id, text.to_string(), meta.clone(), normalized)
            })
            .collect();

        let empty = fitted.iter().filter(|doc| doc.tokens().is_empty()).count();
        if empty > 0 {
            warn!("{} of {} documents are empty after normalization", empty, fitted.len());
        }

        let tokenized: Vec<Vec<&str>> = fitted
            .iter()
            .map(|doc| doc.tokens().iter().map(String::as_str).collect())
            .collect();

        let mut bm25 = Bm25Scorer::with_config(self.config.bm25);
        bm25.fit_tokens(&tokenized);
        let mut tfidf = TfIdfScorer::new();
        tfidf.fit_tokens(&tokenized);

        info!(
            "Hybrid search engine fitted on {} documents (vocabulary: {}, avg length: {:.2})",
            fitted.len(),
            bm25.vocabulary_size(),
            bm25.avg_doc_len()
        );

        self.bm25 = bm25;
        self.tfidf = tfidf;
        self.documents = fitted;

        Ok(())
    }

    /// Fit on bare passages with empty metadata.
    pub fn fit_texts<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        let metadata = vec![DocumentMetadata::default(); documents.len()];
        self.fit(documents, &metadata)
    }

    /// Fit on a loaded corpus.
    pub fn fit_corpus(&mut self, corpus: &Corpus) -> Result<()> {
        self.fit(&corpus.texts, &corpus.metadata)
    }

    /// Search for `query`, returning at most `limit` results.
    pub fn search(
        &self,
        query: &str,
        confession: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        self.run(query, confession, limit).map(|(results, _)| results)
    }

    /// Search with a [`SearchRequest`]; an unset limit uses `default_limit`.
    pub fn search_request(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        self.search_with_diagnostics(request)
            .map(|(results, _)| results)
    }

    /// Search and report how each stage narrowed the corpus.
    pub fn search_with_diagnostics(
        &self,
        request: &SearchRequest,
    ) -> Result<(Vec<SearchResult>, SearchDiagnostics)> {
        let limit = request.limit.unwrap_or(self.config.default_limit);
        self.run(&request.query, request.confession.as_deref(), limit)
    }

    fn run(
        &self,
        query: &str,
        confession: Option<&str>,
        limit: usize,
    ) -> Result<(Vec<SearchResult>, SearchDiagnostics)> {
        if !self.is_fitted() {
            return Err(LectioError::NotFitted);
        }

        let expanded = self.rewriter.expand_query(query);
        let mut diagnostics = SearchDiagnostics {
            main_query: expanded.main.clone(),
            expanded_query: expanded.expanded.clone(),
            ..Default::default()
        };
        if expanded.is_empty() || limit == 0 {
            return Ok((Vec::new(), diagnostics));
        }

        let pool = generate_candidates(
            &self.documents,
            &expanded,
            &self.bm25,
            &self.tfidf,
            &self.ngram,
            &self.config.candidates,
            limit.saturating_mul(self.config.candidates.cap_multiplier),
        );
        diagnostics.bm25_nominees = pool.bm25_nominees;
        diagnostics.ngram_nominees = pool.ngram_nominees;
        diagnostics.tfidf_nominees = pool.tfidf_nominees;
        diagnostics.candidates = pool.ids.len();

        let reranked = self.rerank(&pool.ids, &expanded, confession);

        let outcome = apply_adaptive_threshold(reranked, limit, &self.config.threshold);
        diagnostics.threshold = outcome.threshold;
        diagnostics.floor_applied = outcome.floor_applied;
        diagnostics.after_threshold = outcome.results.len();

        let (results, report) =
            apply_diversity_filters(outcome.results, &self.documents, &self.config.diversity);
        diagnostics.after_book_cap = report.after_book_cap;
        diagnostics.book_cap_skipped = report.book_cap_skipped;
        diagnostics.duplicates_dropped = report.duplicates_dropped;
        diagnostics.returned = results.len();

        Ok((results, diagnostics))
    }

    /// Score candidates with the weighted blend plus boosts.
    fn rerank(
        &self,
        candidates: &[usize],
        query: &ExpandedQuery,
        confession: Option<&str>,
    ) -> Vec<SearchResult> {
        let boosts = BoostCalculator::new(&self.config);
        let weights = &self.config.weights;
        let query_text = query.joined();

        candidates
            .iter()
            .filter_map(|&id| self.documents.get(id))
            .map(|doc| {
                let bm25 = self.bm25.score(&query.expanded, doc.id(), doc.tokens());
                let tfidf = self.tfidf.score(&query.expanded, doc.tokens());
                let ngram = self.ngram.score(&query_text, doc.normalized());
                let base = bm25 * weights.bm25 + tfidf * weights.tfidf + ngram * weights.ngram;

                let metadata = doc.metadata();
                let boost = boosts.calculate(&query.expanded, confession, metadata);
                let total_boost = boost.total();

                SearchResult {
                    id: doc.id(),
                    text: doc.text().to_string(),
                    book_name: metadata.book_name.clone(),
                    author: metadata.author.clone(),
                    confession: metadata.confession.clone(),
                    theme: metadata.theme.clone(),
                    score: base + total_boost,
                    score_breakdown: ScoreBreakdown {
                        bm25,
                        tfidf,
                        ngram,
                        boosts: total_boost,
                    },
                    boosts_applied: boost.applied(),
                }
            })
            .collect()
    }

    /// Whether `fit` has succeeded at least once.
    pub fn is_fitted(&self) -> bool {
        !self.documents.is_empty()
    }

    /// Number of documents in the fitted corpus.
    pub fn corpus_size(&self) -> usize {
        self.documents.len()
    }

    /// The fitted document with the given id.
    pub fn document(&self, id: usize) -> Option<&Document> {
        self.documents.get(id)
    }

    /// All fitted documents in id order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn rewriter(&self) -> &QueryRewriter {
        &self.rewriter
    }

    /// Number of distinct words in the fitted corpus.
    pub fn vocabulary_size(&self) -> usize {
        self.bm25.vocabulary_size()
    }

    /// Mean normalized document length in words.
    pub fn avg_doc_len(&self) -> f64 {
        self.bm25.avg_doc_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(texts: &[&str]) -> HybridSearchEngine {
        let mut engine = HybridSearchEngine::default();
        engine.fit_texts(texts).unwrap();
        engine
    }

    #[test]
    fn test_search_before_fit() {
        let engine = HybridSearchEngine::default();
        assert!(!engine.is_fitted());
        assert!(matches!(
            engine.search("anything", None, 10),
            Err(LectioError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_errors_leave_state_unchanged() {
        let mut engine = fitted(&["first passage", "second passage"]);

        let empty: [&str; 0] = [];
        assert!(matches!(engine.fit_texts(&empty), Err(LectioError::EmptyCorpus)));
        assert!(matches!(
            engine.fit(&["only one"], &[]),
            Err(LectioError::MetadataMismatch {
                documents: 1,
                metadata: 0
            })
        ));

        assert_eq!(engine.corpus_size(), 2);
        assert_eq!(engine.document(1).unwrap().text(), "second passage");
    }

    #[test]
    fn test_refit_replaces_corpus() {
        let mut engine = fitted(&["alpha beta", "gamma delta"]);
        engine.fit_texts(&["epsilon"]).unwrap();

        assert_eq!(engine.corpus_size(), 1);
        assert!(engine.search("alpha", None, 10).unwrap().is_empty());
        assert_eq!(engine.search("epsilon", None, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let engine = fitted(&["alpha beta"]);
        assert!(engine.search("", None, 10).unwrap().is_empty());
        assert!(engine.search("?!...", None, 10).unwrap().is_empty());
    }

    #[test]
    fn test_zero_limit_returns_nothing() {
        let engine = fitted(&["alpha beta"]);
        assert!(engine.search("alpha", None, 0).unwrap().is_empty());
    }

    #[test]
    fn test_breakdown_adds_up() {
        let engine = fitted(&["alpha beta gamma", "delta epsilon", "alpha zeta"]);
        let results = engine.search("alpha", None, 10).unwrap();
        assert!(!results.is_empty());

        let weights = engine.config().weights;
        for result in &results {
            let b = result.score_breakdown;
            let expected =
                b.bm25 * weights.bm25 + b.tfidf * weights.tfidf + b.ngram * weights.ngram + b.boosts;
            assert!((result.score - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_diagnostics() {
        let engine = fitted(&["alpha beta gamma", "delta epsilon", "zeta eta"]);
        let request = SearchRequest::new("Alpha!").limit(5);
        let (results, diagnostics) = engine.search_with_diagnostics(&request).unwrap();

        assert_eq!(diagnostics.main_query, vec!["alpha"]);
        assert_eq!(diagnostics.bm25_nominees, 1);
        assert_eq!(diagnostics.candidates, 1);
        assert!(diagnostics.floor_applied);
        assert_eq!(diagnostics.returned, results.len());
        assert_eq!(engine.search_request(&request).unwrap(), results);
    }

    #[test]
    fn test_diagnostics_count_dropped_duplicates() {
        let engine = fitted(&["alpha beta", "Alpha, beta!", "gamma"]);
        let request = SearchRequest::new("alpha").limit(10);
        let (results, diagnostics) = engine.search_with_diagnostics(&request).unwrap();

        assert_eq!(diagnostics.after_threshold, 2);
        assert_eq!(diagnostics.book_cap_skipped, 0);
        assert_eq!(diagnostics.after_book_cap, 2);
        assert_eq!(diagnostics.duplicates_dropped, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 0);
    }

    #[test]
    fn test_unmatched_components_serialize_as_zero() {
        let engine = fitted(&[
            "cat food recipes",
            "dog training tips",
            "cats and dogs living together",
        ]);
        let results = engine.search("cat dog", None, 3).unwrap();
        let together = results.iter().find(|r| r.id == 2).unwrap();

        assert!(together.score_breakdown.bm25.is_sign_positive());
        assert!(together.score_breakdown.tfidf.is_sign_positive());
        let json = serde_json::to_string(&together.score_breakdown).unwrap();
        assert!(json.contains("\"bm25\":0.0"));
        assert!(!json.contains("-0.0"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_and_sync() {
        assert_send_sync::<HybridSearchEngine>();
    }

    #[test]
    fn test_concurrent_searches_match_sequential() {
        let engine = fitted(&[
            "the cat sat on the mat",
            "dogs bark at night",
            "cats and dogs are pets",
            "a dog and a cat share a mat",
        ]);
        let expected = engine.search("cat dog", Some("sunni"), 10).unwrap();

        let shared = &engine;
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(move || shared.search("cat dog", Some("sunni"), 10).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SearchConfig::default();
        config.bm25.b = 2.0;
        assert!(matches!(
            HybridSearchEngine::new(config),
            Err(LectioError::InvalidConfig(_))
        ));
    }
}
