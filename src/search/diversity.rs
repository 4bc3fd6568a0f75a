//! Anti-tunnel filtering: keep one book or one passage from dominating.

use ahash::AHashMap;
use log::debug;

use super::config::DiversityConfig;
use super::document::Document;
use super::types::SearchResult;
use crate::scoring::similarity::word_set_jaccard;

/// Counts of results removed by each diversity pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiversityReport {
    pub after_book_cap: usize,
    pub book_cap_skipped: usize,
    pub duplicates_dropped: usize,
}

/// Apply the per-book soft cap, then drop near-duplicate passages.
///
/// Both passes keep the input order. `documents` supplies the normalized words
/// of each result, looked up by id.
pub fn apply_diversity_filters(
    results: Vec<SearchResult>,
    documents: &[Document],
    config: &DiversityConfig,
) -> (Vec<SearchResult>, DiversityReport) {
    let total = results.len();
    let capped = apply_book_cap(results, config);
    let after_book_cap = capped.len();

    let deduped = remove_near_duplicates(capped, documents, config.dup_jaccard_cutoff);
    let report = DiversityReport {
        after_book_cap,
        book_cap_skipped: total - after_book_cap,
        duplicates_dropped: after_book_cap - deduped.len(),
    };

    (deduped, report)
}

/// Per-book soft cap.
///
/// A result from a book that already has `per_book_cap` accepted results is
/// still accepted while fewer than `accepted_soft_cap` results are accepted in
/// total; otherwise it is skipped. Over-cap acceptances do not raise the
/// book's count.
pub fn apply_book_cap(results: Vec<SearchResult>, config: &DiversityConfig) -> Vec<SearchResult> {
    let total = results.len();
    let mut book_counts: AHashMap<String, usize> = AHashMap::new();
    let mut accepted = Vec::with_capacity(total);

    for result in results {
        let count = book_counts.entry(result.book_name.clone()).or_insert(0);
        if *count < config.per_book_cap {
            *count += 1;
            accepted.push(result);
        } else if accepted.len() < config.accepted_soft_cap {
            accepted.push(result);
        }
    }

    let skipped = total - accepted.len();
    if skipped > 0 {
        debug!("Book cap skipped {} results", skipped);
    }

    accepted
}

/// Drop every result whose word set is at least `cutoff` Jaccard-similar to an
/// earlier kept result.
pub fn remove_near_duplicates(
    results: Vec<SearchResult>,
    documents: &[Document],
    cutoff: f64,
) -> Vec<SearchResult> {
    let total = results.len();
    let mut kept: Vec<SearchResult> = Vec::with_capacity(total);
    for result in results {
        let words = tokens_of(documents, &result);
        let duplicate = kept
            .iter()
            .any(|existing| word_set_jaccard(words, tokens_of(documents, existing)) >= cutoff);
        if !duplicate {
            kept.push(result);
        }
    }

    if kept.len() < total {
        debug!("Dropped {} near-duplicate results", total - kept.len());
    }

    kept
}

fn tokens_of<'a>(documents: &'a [Document], result: &SearchResult) -> &'a [String] {
    documents
        .get(result.id)
        .map(Document::tokens)
        .unwrap_or_default()
}
