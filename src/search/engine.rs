//! Common interface of the scoring strategies.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::annotations::index::{AnnotationIndex, EntryId};
use crate::config::MatchAlgorithm;
use crate::search::classic::ClassicMatcher;
use crate::search::fuzzy::FuzzyMatcher;
use crate::search::normalize::match_key;
use crate::search::ratio::SimilarityRatio;
use crate::search::spellcheck::SpellChecker;

/// Maximum language-tier credit, given to the first tier.
pub const LANGUAGE_WEIGHT: f64 = 2.0;

/// Credit for matching in tier `rank` of `tier_count`.
pub fn language_weight(rank: usize, tier_count: usize) -> f64 {
    if tier_count == 0 {
        return 0.0;
    }
    LANGUAGE_WEIGHT * (1.0 - rank as f64 / tier_count as f64)
}

/// One query word and its spelling alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermWord {
    pub token: String,
    pub alternatives: SmallVec<[String; 2]>,
}

impl TermWord {
    /// The word itself first, then each alternative.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.token.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }
}

/// Normalized query words handed to a strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchTerms {
    pub words: Vec<TermWord>,
    pub frequency_hint: f64,
}

impl SearchTerms {
    pub fn new(tokens: &[String]) -> Self {
        Self {
            words: tokens
                .iter()
                .map(|token| TermWord {
                    token: token.clone(),
                    alternatives: SmallVec::new(),
                })
                .collect(),
            frequency_hint: 0.0,
        }
    }

    pub fn with_frequency_hint(mut self, hint: f64) -> Self {
        self.frequency_hint = if hint.is_finite() { hint } else { 0.0 };
        self
    }

    /// Union each word's spelling suggestions into its alternatives.
    pub fn with_suggestions(mut self, checker: &dyn SpellChecker) -> Self {
        let mut added = 0usize;
        for word in &mut self.words {
            for suggestion in checker.suggest(&word.token) {
                let key = match_key(&suggestion);
                if !key.is_empty() && key != word.token && !word.alternatives.contains(&key) {
                    word.alternatives.push(key);
                    added += 1;
                }
            }
        }
        if added > 0 {
            debug!(added, "spellcheck_expanded");
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn phrase_key(&self) -> String {
        self.words
            .iter()
            .map(|w| w.token.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The typed phrase followed by every single-word correction of it.
    pub fn phrase_variants(&self) -> Vec<String> {
        let mut out = vec![self.phrase_key()];
        for (i, word) in self.words.iter().enumerate() {
            for alternative in &word.alternatives {
                let phrase = self
                    .words
                    .iter()
                    .enumerate()
                    .map(|(j, w)| if i == j { alternative.as_str() } else { w.token.as_str() })
                    .collect::<Vec<_>>()
                    .join(" ");
                if !out.contains(&phrase) {
                    out.push(phrase);
                }
            }
        }
        out
    }
}

/// Why an entry matched, for the comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchDetail {
    /// Matched keywords other than the name, as written in the data.
    pub keywords: Vec<String>,
    /// The synthetic key that produced the match, echoed in quotes.
    pub echo: Option<String>,
    /// Matched category labels, shown in braces.
    pub categories: Vec<String>,
}

/// One scored row: an entry as seen through one language tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub entry: EntryId,
    pub tier: usize,
    pub score: f64,
    /// Distinct query words that hit (exact or prefix), for tie-breaking.
    pub hits: usize,
    pub detail: MatchDetail,
}

/// A scoring strategy over the whole index.
pub trait MatchStrategy: Send + Sync {
    fn algorithm(&self) -> MatchAlgorithm;

    fn search(&self, index: &AnnotationIndex, terms: &SearchTerms) -> Vec<ScoredMatch>;
}

/// Pick the strategy for `algorithm`. Fuzzy matching needs a ratio
/// primitive; without one it degrades to classic.
pub fn strategy_for(
    algorithm: MatchAlgorithm,
    ratio: Option<Arc<dyn SimilarityRatio>>,
) -> Box<dyn MatchStrategy> {
    match (algorithm, ratio) {
        (MatchAlgorithm::Classic, _) => Box::new(ClassicMatcher),
        (MatchAlgorithm::Fuzzy, Some(ratio)) => Box::new(FuzzyMatcher::new(ratio)),
        (MatchAlgorithm::Fuzzy, None) => {
            warn!("fuzzy matching requested without a ratio primitive; using classic");
            Box::new(ClassicMatcher)
        }
    }
}
