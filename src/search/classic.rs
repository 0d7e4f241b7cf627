//! Classic keyword-set matching.
//!
//! An entry is scored separately in every tier that annotates it. A query
//! word hits a row when it equals one of the row's tokens, or, failing
//! that, when it is a proper prefix (two characters or more) of one. Rows
//! without any hit are dropped.

use crate::annotations::index::{AnnotationIndex, EntryId, TierRow};
use crate::config::MatchAlgorithm;
use crate::search::engine::{MatchDetail, MatchStrategy, ScoredMatch, SearchTerms, language_weight};

pub const EXACT_TOKEN_SCORE: f64 = 10.0;
pub const PREFIX_TOKEN_SCORE: f64 = 5.0;
/// Added when the whole query equals the name or a synthetic key.
pub const EXACT_PHRASE_BONUS: f64 = 4.0;
pub const MIN_PREFIX_CHARS: usize = 2;

/// Inputs of the classic score, kept apart so the formula is testable alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassicSignals {
    pub exact_hits: usize,
    pub prefix_hits: usize,
    pub exact_phrase: bool,
    pub tier_rank: usize,
    pub tier_count: usize,
    pub frequency_hint: f64,
}

pub fn classic_score(signals: &ClassicSignals) -> f64 {
    let mut score = EXACT_TOKEN_SCORE * signals.exact_hits as f64
        + PREFIX_TOKEN_SCORE * signals.prefix_hits as f64;
    if signals.exact_phrase {
        score += EXACT_PHRASE_BONUS;
    }
    score + language_weight(signals.tier_rank, signals.tier_count) + signals.frequency_hint
}

fn prefix_eligible(token: &str) -> bool {
    token.chars().count() >= MIN_PREFIX_CHARS
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicMatcher;

impl MatchStrategy for ClassicMatcher {
    fn algorithm(&self) -> MatchAlgorithm {
        MatchAlgorithm::Classic
    }

    fn search(&self, index: &AnnotationIndex, terms: &SearchTerms) -> Vec<ScoredMatch> {
        if terms.is_empty() {
            return Vec::new();
        }
        let phrases = terms.phrase_variants();
        let tier_count = index.tiers().len();
        let mut out = Vec::new();

        for (rank, tier) in index.tiers().iter().enumerate() {
            let mut candidates: Vec<EntryId> = Vec::new();
            for word in &terms.words {
                for variant in word.variants() {
                    if prefix_eligible(variant) {
                        candidates.extend(tier.with_prefix(variant));
                    } else {
                        candidates.extend_from_slice(tier.exact(variant));
                    }
                }
            }
            candidates.sort_unstable();
            candidates.dedup();

            for id in candidates {
                let Some(row) = tier.row(id) else { continue };
                if let Some((signals, detail)) = score_row(row, terms, &phrases) {
                    let signals = ClassicSignals {
                        tier_rank: rank,
                        tier_count,
                        frequency_hint: terms.frequency_hint,
                        ..signals
                    };
                    out.push(ScoredMatch {
                        entry: id,
                        tier: rank,
                        score: classic_score(&signals),
                        hits: signals.exact_hits + signals.prefix_hits,
                        detail,
                    });
                }
            }
        }
        out
    }
}

fn score_row(
    row: &TierRow,
    terms: &SearchTerms,
    phrases: &[String],
) -> Option<(ClassicSignals, MatchDetail)> {
    let mut signals = ClassicSignals::default();
    let mut exact: Vec<&str> = Vec::new();
    let mut prefixes: Vec<&str> = Vec::new();

    for word in &terms.words {
        if let Some(v) = word.variants().find(|v| row.has_token(v)) {
            signals.exact_hits += 1;
            exact.push(v);
        } else if let Some(v) = word
            .variants()
            .find(|v| prefix_eligible(v) && row.has_proper_prefix(v))
        {
            signals.prefix_hits += 1;
            prefixes.push(v);
        }
    }
    if signals.exact_hits + signals.prefix_hits == 0 {
        return None;
    }

    let name_matches = row
        .name
        .as_ref()
        .is_some_and(|name| phrases.contains(&name.key));
    let synthetic_phrase = row.synthetic.iter().find(|l| phrases.contains(&l.key));
    signals.exact_phrase = name_matches || synthetic_phrase.is_some();

    let hit = |token: &String| {
        exact.contains(&token.as_str()) || prefixes.iter().any(|p| token.starts_with(p))
    };
    let name_tokens: &[String] = row.name.as_ref().map_or(&[], |n| n.tokens.as_slice());

    let mut detail = MatchDetail::default();
    for keyword in &row.keywords {
        let adds_something = keyword.tokens.iter().any(|t| !name_tokens.contains(t));
        if adds_something && keyword.tokens.iter().any(hit) {
            detail.keywords.push(keyword.text.clone());
        }
    }

    if !name_matches {
        let covered = |t: &String| {
            name_tokens.contains(t) || row.keywords.iter().any(|k| k.tokens.contains(t))
        };
        detail.echo = synthetic_phrase
            .or_else(|| {
                row.synthetic
                    .iter()
                    .find(|l| l.tokens.iter().any(|t| hit(t) && !covered(t)))
            })
            .map(|l| l.text.clone());
    }

    for category in &row.categories {
        if category.tokens.iter().any(|t| exact.contains(&t.as_str())) {
            detail.categories.push(category.text.clone());
        }
    }

    Some((signals, detail))
}
