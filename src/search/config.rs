//! Configuration for the hybrid search engine.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LectioError, Result};
use crate::scoring::{Bm25Config, NgramConfig};

/// Linear blend weights for the component scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerWeights {
    pub bm25: f64,
    pub tfidf: f64,
    pub ngram: f64,
    /// Accepted for compatibility; no semantic scorer is wired in, so it never
    /// contributes to a score.
    pub semantic: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            bm25: 0.45,
            tfidf: 0.20,
            ngram: 0.25,
            semantic: 0.10,
        }
    }
}

/// Caps and rates for the additive boosts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Maximum theme boost.
    pub theme_cap: f64,
    /// Theme boost per query word found in the document theme.
    pub theme_per_match: f64,
    /// Confession boost for an exact tag match.
    pub confession_cap: f64,
    /// Share of `confession_cap` granted when the filter is a known tag that
    /// differs from the document's.
    pub confession_partial_ratio: f64,
    /// Canonical-source boost.
    pub canonical_cap: f64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            theme_cap: 0.10,
            theme_per_match: 0.03,
            confession_cap: 0.10,
            confession_partial_ratio: 0.5,
            canonical_cap: 0.05,
        }
    }
}

/// Adaptive threshold policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Multiplier applied to the median candidate score.
    pub median_mult: f64,
    /// Multiplier applied to the 80th-percentile candidate score.
    pub p80_mult: f64,
    /// Minimum number of results kept when the threshold is too strict.
    pub result_floor: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            median_mult: 0.65,
            p80_mult: 0.85,
            result_floor: 15,
        }
    }
}

/// Anti-tunnel diversity policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityConfig {
    /// Results per book before further passages from it are skipped.
    pub per_book_cap: usize,
    /// Below this many accepted results, the per-book cap is ignored.
    pub accepted_soft_cap: usize,
    /// Word-set Jaccard similarity at which two passages count as duplicates.
    pub dup_jaccard_cutoff: f64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            per_book_cap: 3,
            accepted_soft_cap: 20,
            dup_jaccard_cutoff: 0.9,
        }
    }
}

/// Candidate generation breadth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Top BM25 documents nominated.
    pub bm25_pool: usize,
    /// Top n-gram documents nominated.
    pub ngram_pool: usize,
    /// Top TF-IDF documents nominated.
    pub tfidf_pool: usize,
    /// The candidate union is capped at `limit * cap_multiplier`.
    pub cap_multiplier: usize,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            bm25_pool: 60,
            ngram_pool: 40,
            tfidf_pool: 20,
            cap_multiplier: 6,
        }
    }
}

/// Full engine configuration.
///
/// Every section falls back to its defaults when missing from a JSON file, so a
/// deployment only has to spell out what it changes:
///
/// ```json
/// { "weights": { "bm25": 0.5 }, "diversity": { "per_book_cap": 2 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub bm25: Bm25Config,
    pub ngram: NgramConfig,
    pub weights: ScorerWeights,
    pub boosts: BoostConfig,
    pub threshold: ThresholdConfig,
    pub diversity: DiversityConfig,
    pub candidates: CandidateConfig,
    /// Canonical-source keywords keyed by confession tag.
    pub canonical_sources: BTreeMap<String, Vec<String>>,
    /// Recognized confession tags.
    pub confessions: Vec<String>,
    /// Result limit used when a request does not set one.
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let canonical_sources = [
            (
                "orthodox",
                &["библия", "евангелие", "послание", "символ веры"][..],
            ),
            ("sunni", &["коран", "бухари", "муслим", "абу дауд"][..]),
            ("shia", &["коран", "аль-кафи", "бихар аль-анвар"][..]),
        ]
        .into_iter()
        .map(|(confession, keywords)| {
            (
                confession.to_string(),
                keywords.iter().map(|k| k.to_string()).collect(),
            )
        })
        .collect();

        Self {
            bm25: Bm25Config::default(),
            ngram: NgramConfig::default(),
            weights: ScorerWeights::default(),
            boosts: BoostConfig::default(),
            threshold: ThresholdConfig::default(),
            diversity: DiversityConfig::default(),
            candidates: CandidateConfig::default(),
            canonical_sources,
            confessions: vec!["orthodox".into(), "sunni".into(), "shia".into()],
            default_limit: 20,
        }
    }
}

impl SearchConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: SearchConfig = serde_json::from_str(&content).map_err(|e| {
            LectioError::parse(format!(
                "Failed to parse search configuration JSON from '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Whether `tag` is one of the recognized confession tags (case-insensitive).
    pub fn is_known_confession(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        !tag.is_empty()
            && self
                .confessions
                .iter()
                .any(|known| known.to_lowercase() == tag)
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.bm25.k1.is_finite() || self.bm25.k1 < 0.0 {
            return Err(LectioError::invalid_config(
                "bm25.k1 must be finite and non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.bm25.b) {
            return Err(LectioError::invalid_config("bm25.b must be within [0, 1]"));
        }

        self.ngram.validate()?;

        let weights = [
            ("weights.bm25", self.weights.bm25),
            ("weights.tfidf", self.weights.tfidf),
            ("weights.ngram", self.weights.ngram),
            ("weights.semantic", self.weights.semantic),
            ("boosts.theme_cap", self.boosts.theme_cap),
            ("boosts.theme_per_match", self.boosts.theme_per_match),
            ("boosts.confession_cap", self.boosts.confession_cap),
            (
                "boosts.confession_partial_ratio",
                self.boosts.confession_partial_ratio,
            ),
            ("boosts.canonical_cap", self.boosts.canonical_cap),
            ("threshold.median_mult", self.threshold.median_mult),
            ("threshold.p80_mult", self.threshold.p80_mult),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(LectioError::invalid_config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        let cutoff = self.diversity.dup_jaccard_cutoff;
        if !(cutoff > 0.0 && cutoff <= 1.0) {
            return Err(LectioError::invalid_config(format!(
                "diversity.dup_jaccard_cutoff must be within (0, 1], got {cutoff}"
            )));
        }

        Ok(())
    }
}
