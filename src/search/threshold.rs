//! Adaptive score threshold.

use log::debug;

use super::candidates::by_score_then_id;
use super::config::ThresholdConfig;
use super::types::SearchResult;

/// Outcome of thresholding a reranked candidate list.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdOutcome {
    /// Survivors in score order, at most `limit` long.
    pub results: Vec<SearchResult>,
    pub threshold: f64,
    /// Whether fewer than `result_floor` candidates passed and the top
    /// `result_floor` were kept instead.
    pub floor_applied: bool,
}

/// Median of `values`; the mean of the two middle values for even counts.
///
/// Returns 0.0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// The `p`-th percentile of `values`, interpolating linearly between the two
/// closest ranks.
///
/// Returns 0.0 for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }

    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Keep the candidates scoring at least `max(median * m, p80 * p)`.
///
/// Results are sorted by score descending (ties by ascending id) first. When
/// fewer than `result_floor` pass, the top `result_floor` are kept regardless of
/// score. The survivors are finally cut at `limit`.
pub fn apply_adaptive_threshold(
    mut results: Vec<SearchResult>,
    limit: usize,
    config: &ThresholdConfig,
) -> ThresholdOutcome {
    if results.is_empty() {
        return ThresholdOutcome {
            results,
            threshold: 0.0,
            floor_applied: false,
        };
    }

    results.sort_by(|a, b| by_score_then_id((a.id, a.score), (b.id, b.score)));

    let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    let median_score = median(&scores);
    let p80_score = percentile(&scores, 80.0);
    let threshold = (median_score * config.median_mult).max(p80_score * config.p80_mult);

    let passing = results.iter().filter(|r| r.score >= threshold).count();
    let floor_applied = passing < config.result_floor;

    // Sorted descending, so survivors are a prefix either way.
    let keep = if floor_applied {
        config.result_floor
    } else {
        passing
    };
    results.truncate(keep.min(limit));

    debug!(
        "Score stats: min={:.3}, median={:.3}, p80={:.3}, max={:.3}",
        scores.last().copied().unwrap_or_default(),
        median_score,
        p80_score,
        scores.first().copied().unwrap_or_default()
    );
    debug!(
        "Threshold: {:.3}, passing: {}, floor applied: {}, returned: {}",
        threshold,
        passing,
        floor_applied,
        results.len()
    );

    ThresholdOutcome {
        results,
        threshold,
        floor_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::types::ScoreBreakdown;

    fn result(id: usize, score: f64) -> SearchResult {
        SearchResult {
            id,
            text: format!("passage {id}"),
            book_name: String::new(),
            author: String::new(),
            confession: String::new(),
            theme: String::new(),
            score,
            score_breakdown: ScoreBreakdown::default(),
            boosts_applied: Vec::new(),
        }
    }

    fn ids(results: &[SearchResult]) -> Vec<usize> {
        results.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&values, 80.0) - 4.2).abs() < 1e-12);
        assert_eq!(percentile(&values, 100.0), 5.0);
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&[7.0], 80.0), 7.0);
    }

    #[test]
    fn test_threshold_filters_when_enough_pass() {
        let config = ThresholdConfig {
            result_floor: 2,
            ..ThresholdConfig::default()
        };
        let results = vec![
            result(0, 1.0),
            result(1, 0.1),
            result(2, 0.9),
            result(3, 0.2),
            result(4, 0.95),
        ];

        // median 0.9, p80 0.96: threshold max(0.585, 0.816) = 0.816
        let outcome = apply_adaptive_threshold(results, 10, &config);
        assert!((outcome.threshold - 0.816).abs() < 1e-9);
        assert!(!outcome.floor_applied);
        assert_eq!(ids(&outcome.results), vec![0, 4, 2]);
    }

    #[test]
    fn test_threshold_floor_and_limit() {
        let results = vec![result(0, 1.0), result(1, 0.1), result(2, 0.1)];

        // Floor of 15 keeps everything despite the threshold.
        let outcome = apply_adaptive_threshold(results.clone(), 10, &ThresholdConfig::default());
        assert!(outcome.floor_applied);
        assert_eq!(ids(&outcome.results), vec![0, 1, 2]);

        let outcome = apply_adaptive_threshold(results, 2, &ThresholdConfig::default());
        assert_eq!(ids(&outcome.results), vec![0, 1]);
    }

    #[test]
    fn test_threshold_empty() {
        let outcome = apply_adaptive_threshold(Vec::new(), 10, &ThresholdConfig::default());
        assert!(outcome.results.is_empty());
        assert!(!outcome.floor_applied);
    }
}
