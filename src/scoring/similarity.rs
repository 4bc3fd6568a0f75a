//! Set similarity helpers.

use std::hash::Hash;

use ahash::AHashSet;

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`, or 0.0 when both sets are empty.
pub fn jaccard<T: Eq + Hash>(a: &AHashSet<T>, b: &AHashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Jaccard similarity between the word sets of two token lists.
///
/// Returns 0.0 when either side has no words, so two empty passages are never
/// treated as duplicates of each other.
pub fn word_set_jaccard<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let words_a: AHashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let words_b: AHashSet<&str> = b.iter().map(AsRef::as_ref).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    jaccard(&words_a, &words_b)
}

/// Sum with Neumaier compensation, so blends of weights that add up to one
/// come out as exactly one.
pub fn compensated_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;

    for value in values {
        let t = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - t) + value;
        } else {
            compensation += (value - t) + sum;
        }
        sum = t;
    }

    sum + compensation
}
