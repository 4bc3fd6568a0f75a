//! Candidate generation: each scorer nominates its best documents.

use std::cmp::Ordering;

use ahash::AHashSet;
use log::debug;

use super::config::CandidateConfig;
use super::document::Document;
use crate::analysis::ExpandedQuery;
use crate::scoring::{NgramScorer, TermScorer};

/// Candidate ids plus per-scorer nomination counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePool {
    /// Deduplicated candidate ids in nomination order, capped.
    pub ids: Vec<usize>,
    pub bm25_nominees: usize,
    pub ngram_nominees: usize,
    pub tfidf_nominees: usize,
}

/// Order by score descending, then id ascending.
pub(crate) fn by_score_then_id(a: (usize, f64), b: (usize, f64)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(&b.0))
}

/// Ids of the `k` best strictly positive scores.
pub(crate) fn top_positive<I>(scores: I, k: usize) -> Vec<usize>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let mut positive: Vec<(usize, f64)> = scores
        .into_iter()
        .filter(|&(_, score)| score > 0.0)
        .collect();
    positive.sort_by(|a, b| by_score_then_id(*a, *b));
    positive.into_iter().take(k).map(|(id, _)| id).collect()
}

/// Let a word-token scorer nominate up to `k` documents.
pub(crate) fn nominate(
    scorer: &dyn TermScorer,
    documents: &[Document],
    query: &[String],
    k: usize,
) -> Vec<usize> {
    let ids = top_positive(
        documents
            .iter()
            .map(|doc| (doc.id(), scorer.score(query, doc.id(), doc.tokens()))),
        k,
    );
    debug!("{} nominated {} documents", scorer.name(), ids.len());
    ids
}

/// Generate the candidate pool for a query.
///
/// BM25 nominees come first, then n-gram, then TF-IDF; the first nomination of
/// an id wins, and the union is cut at `cap`.
pub fn generate_candidates(
    documents: &[Document],
    query: &ExpandedQuery,
    bm25: &dyn TermScorer,
    tfidf: &dyn TermScorer,
    ngram: &NgramScorer,
    config: &CandidateConfig,
    cap: usize,
) -> CandidatePool {
    let bm25_ids = nominate(bm25, documents, &query.expanded, config.bm25_pool);

    let query_text = query.joined();
    let ngram_ids = top_positive(
        documents
            .iter()
            .map(|doc| (doc.id(), ngram.score(&query_text, doc.normalized()))),
        config.ngram_pool,
    );

    let tfidf_ids = nominate(tfidf, documents, &query.expanded, config.tfidf_pool);

    let mut seen = AHashSet::new();
    let ids: Vec<usize> = bm25_ids
        .iter()
        .chain(&ngram_ids)
        .chain(&tfidf_ids)
        .copied()
        .filter(|id| seen.insert(*id))
        .take(cap)
        .collect();

    debug!(
        "Generated {} candidates (bm25: {}, ngram: {}, tfidf: {}, cap: {})",
        ids.len(),
        bm25_ids.len(),
        ngram_ids.len(),
        tfidf_ids.len(),
        cap
    );

    CandidatePool {
        ids,
        bm25_nominees: bm25_ids.len(),
        ngram_nominees: ngram_ids.len(),
        tfidf_nominees: tfidf_ids.len(),
    }
}
