//! Fuzzy matching over label strings.
//!
//! Each row's name, keywords and synthetic keys are compared with the whole
//! query (and its spelling corrections) through the injected ratio
//! primitive. The best label decides the row; category labels hit by a query
//! word add a small bonus.

use std::sync::Arc;

use crate::annotations::index::{AnnotationIndex, LabelKind, TierRow};
use crate::config::MatchAlgorithm;
use crate::search::engine::{MatchDetail, MatchStrategy, ScoredMatch, SearchTerms, language_weight};
use crate::search::ratio::{SimilarityRatio, token_set_ratio};

/// Minimum label similarity (0-100) for a row to be admitted.
pub const FUZZY_CUTOFF: f64 = 60.0;
pub const CATEGORY_BONUS: f64 = 2.0;
/// Category credit is capped so it cannot lift a partial match over an exact one.
pub const MAX_CATEGORY_HITS: usize = 2;
/// Added when a label equals the query outright.
pub const EXACT_LABEL_BONUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FuzzySignals {
    /// Best combined similarity over all labels, 0-100.
    pub similarity: f64,
    pub exact_label: bool,
    pub category_hits: usize,
    pub tier_rank: usize,
    pub tier_count: usize,
    pub frequency_hint: f64,
}

/// Mean of the full-string and token-set ratios.
pub fn combined_ratio(ratio: &dyn SimilarityRatio, query: &str, label: &str) -> f64 {
    (ratio.ratio(query, label) + token_set_ratio(ratio, query, label)) / 2.0
}

pub fn fuzzy_score(signals: &FuzzySignals) -> f64 {
    let mut score = signals.similarity
        + CATEGORY_BONUS * signals.category_hits.min(MAX_CATEGORY_HITS) as f64;
    if signals.exact_label {
        score += EXACT_LABEL_BONUS;
    }
    score + language_weight(signals.tier_rank, signals.tier_count) + signals.frequency_hint
}

pub struct FuzzyMatcher {
    ratio: Arc<dyn SimilarityRatio>,
}

impl std::fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyMatcher").finish_non_exhaustive()
    }
}

impl FuzzyMatcher {
    pub fn new(ratio: Arc<dyn SimilarityRatio>) -> Self {
        Self { ratio }
    }

    fn score_row(
        &self,
        row: &TierRow,
        phrases: &[String],
        terms: &SearchTerms,
    ) -> Option<(FuzzySignals, MatchDetail)> {
        let mut best: Option<(f64, LabelKind, &str)> = None;
        let mut exact_label = false;
        for (kind, label) in row.text_labels() {
            for phrase in phrases {
                let similarity = combined_ratio(self.ratio.as_ref(), phrase, &label.key);
                if label.key == *phrase {
                    exact_label = true;
                }
                if best.is_none_or(|(s, _, _)| similarity > s) {
                    best = Some((similarity, kind, label.text.as_str()));
                }
            }
        }
        let (similarity, kind, text) = best?;
        if similarity < FUZZY_CUTOFF {
            return None;
        }

        let mut detail = MatchDetail::default();
        match kind {
            LabelKind::Name => {}
            LabelKind::Keyword => detail.keywords.push(text.to_string()),
            LabelKind::Synthetic => detail.echo = Some(text.to_string()),
        }
        let query_tokens: Vec<&str> = terms.words.iter().flat_map(|w| w.variants()).collect();
        for category in &row.categories {
            if category.tokens.iter().any(|t| query_tokens.contains(&t.as_str())) {
                detail.categories.push(category.text.clone());
            }
        }

        let signals = FuzzySignals {
            similarity,
            exact_label,
            category_hits: detail.categories.len(),
            ..FuzzySignals::default()
        };
        Some((signals, detail))
    }
}

impl MatchStrategy for FuzzyMatcher {
    fn algorithm(&self) -> MatchAlgorithm {
        MatchAlgorithm::Fuzzy
    }

    fn search(&self, index: &AnnotationIndex, terms: &SearchTerms) -> Vec<ScoredMatch> {
        if terms.is_empty() {
            return Vec::new();
        }
        let phrases = terms.phrase_variants();
        let tier_count = index.tiers().len();
        let mut out = Vec::new();

        for (rank, tier) in index.tiers().iter().enumerate() {
            for (id, row) in tier.rows() {
                let Some((signals, detail)) = self.score_row(row, &phrases, terms) else {
                    continue;
                };
                let signals = FuzzySignals {
                    tier_rank: rank,
                    tier_count,
                    frequency_hint: terms.frequency_hint,
                    ..signals
                };
                out.push(ScoredMatch {
                    entry: id,
                    tier: rank,
                    score: fuzzy_score(&signals),
                    hits: detail.categories.len() + usize::from(signals.exact_label),
                    detail,
                });
            }
        }
        out
    }
}
