//! String-similarity primitives for fuzzy matching, on a 0-100 scale.

use std::collections::BTreeSet;

/// Similarity of two strings, 0.0 (unrelated) to 100.0 (identical).
pub trait SimilarityRatio: Send + Sync {
    fn ratio(&self, a: &str, b: &str) -> f64;
}

/// Normalized Levenshtein similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinRatio;

impl SimilarityRatio for LevenshteinRatio {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b) * 100.0
    }
}

/// Order-insensitive comparison of the word sets of `a` and `b`.
///
/// Shared words are compared against each side's leftovers; when one word
/// set contains the other the result is 100.
pub fn token_set_ratio(ratio: &dyn SimilarityRatio, a: &str, b: &str) -> f64 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).copied().collect::<Vec<_>>().join(" ");
    let only_left = left.difference(&right).copied().collect::<Vec<_>>().join(" ");
    let only_right = right.difference(&left).copied().collect::<Vec<_>>().join(" ");

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100.0;
    }

    let join = |base: &str, rest: &str| {
        if base.is_empty() {
            rest.to_string()
        } else {
            format!("{base} {rest}")
        }
    };
    let with_left = join(&shared, &only_left);
    let with_right = join(&shared, &only_right);

    let mut best = ratio.ratio(&with_left, &with_right);
    if !shared.is_empty() {
        best = best
            .max(ratio.ratio(&shared, &with_left))
            .max(ratio.ratio(&shared, &with_right));
    }
    best
}
