//! The matcher facade handed to an input method.
//!
//! A query goes through these steps, stopping at the first that answers:
//!
//! 1. Empty after trimming: no candidates
//! 2. Hex code point containing a decimal digit (`2019`): that character only
//! 3. A phrase already in the data (`🐫`): similarity search for it
//! 4. Only tone words (`tone1`): the modifier characters themselves
//! 5. Words plus tone words (`man tone5`): toned variants of the tone-capable
//!    matches, falling back to plain matching when there are none
//! 6. Plain matching with the configured strategy; a letters-only hex word
//!    (`face`) also gets its code point appended

use std::sync::Arc;

use tracing::debug;

use crate::annotations::index::AnnotationIndex;
use crate::annotations::language::expand_languages;
use crate::annotations::source::{AnnotationSource, SourceError};
use crate::config::{MatchAlgorithm, MatcherConfig};
use crate::model::{Candidate, Entry};
use crate::search::cache::{CacheKey, CandidateCache};
use crate::search::codepoint::{CodePointQuery, code_point_comment, parse_code_point};
use crate::search::engine::{MatchDetail, MatchStrategy, SearchTerms, strategy_for};
use crate::search::normalize::NormalizedQuery;
use crate::search::ranker::{CandidateRanker, assemble_comment, sort_matches};
use crate::search::ratio::{LevenshteinRatio, SimilarityRatio};
use crate::search::similar::similar;
use crate::search::skin_tone::{assign_tones, compose_phrase, variant_name};
use crate::search::spellcheck::{NoSpellCheck, SpellChecker};
use crate::search::transliterate::TransliterationRegistry;

/// Optional collaborators, chosen once at construction.
#[derive(Clone)]
pub struct Capabilities {
    pub transliteration: TransliterationRegistry,
    pub spellchecker: Arc<dyn SpellChecker>,
    /// Fuzzy matching degrades to classic without a ratio primitive.
    pub ratio: Option<Arc<dyn SimilarityRatio>>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            transliteration: TransliterationRegistry::builtin(),
            spellchecker: Arc::new(NoSpellCheck),
            ratio: Some(Arc::new(LevenshteinRatio)),
        }
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("transliteration", &self.transliteration)
            .field("ratio", &self.ratio.is_some())
            .finish_non_exhaustive()
    }
}

impl Capabilities {
    /// No transliteration, no spell checking, no fuzzy primitive.
    pub fn none() -> Self {
        Self {
            transliteration: TransliterationRegistry::new(),
            spellchecker: Arc::new(NoSpellCheck),
            ratio: None,
        }
    }

    pub fn with_transliteration(mut self, registry: TransliterationRegistry) -> Self {
        self.transliteration = registry;
        self
    }

    pub fn with_spellchecker(mut self, spellchecker: Arc<dyn SpellChecker>) -> Self {
        self.spellchecker = spellchecker;
        self
    }

    pub fn with_ratio(mut self, ratio: Option<Arc<dyn SimilarityRatio>>) -> Self {
        self.ratio = ratio;
        self
    }
}

/// Per-call overrides for [`EmojiMatcher::candidates_with`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub match_limit: Option<usize>,
    pub spellcheck: Option<bool>,
    /// Added to every produced score, e.g. from the caller's usage history.
    pub frequency_hint: f64,
}

/// Immutable after construction; safe to share across threads.
pub struct EmojiMatcher {
    config: MatcherConfig,
    languages: Vec<String>,
    index: AnnotationIndex,
    strategy: Box<dyn MatchStrategy>,
    spellchecker: Arc<dyn SpellChecker>,
    cache: Option<CandidateCache>,
}

impl std::fmt::Debug for EmojiMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmojiMatcher")
            .field("languages", &self.languages)
            .field("algorithm", &self.strategy.algorithm())
            .field("entries", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl EmojiMatcher {
    pub fn new(entries: Vec<Entry>, config: MatcherConfig) -> Self {
        Self::with_capabilities(entries, config, Capabilities::default())
    }

    pub fn with_capabilities(
        entries: Vec<Entry>,
        config: MatcherConfig,
        capabilities: Capabilities,
    ) -> Self {
        let languages = expand_languages(&config.languages);
        let index = AnnotationIndex::build(entries, &languages, &capabilities.transliteration);
        let strategy = strategy_for(config.match_algorithm, capabilities.ratio.clone());
        let cache = CandidateCache::new(config.cache_capacity);
        Self {
            config,
            languages,
            index,
            strategy,
            spellchecker: capabilities.spellchecker,
            cache,
        }
    }

    /// Load entries from a provider, then build.
    pub fn from_source(
        source: &dyn AnnotationSource,
        config: MatcherConfig,
        capabilities: Capabilities,
    ) -> Result<Self, SourceError> {
        let entries = source.load()?;
        Ok(Self::with_capabilities(entries, config, capabilities))
    }

    /// Expanded language tiers, English last.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Strategy in effect, after any fallback.
    pub fn algorithm(&self) -> MatchAlgorithm {
        self.strategy.algorithm()
    }

    pub fn candidates(
        &self,
        query: &str,
        match_limit: Option<usize>,
        spellcheck: Option<bool>,
    ) -> Vec<Candidate> {
        self.candidates_with(
            query,
            &QueryOptions {
                match_limit,
                spellcheck,
                frequency_hint: 0.0,
            },
        )
    }

    pub fn candidates_with(&self, query: &str, options: &QueryOptions) -> Vec<Candidate> {
        let limit = options.match_limit.unwrap_or(self.config.match_limit);
        let query = NormalizedQuery::parse(query);
        if limit == 0 || query.raw.is_empty() {
            return Vec::new();
        }
        let spellcheck = options.spellcheck.unwrap_or(self.config.spellcheck);
        let hint = if options.frequency_hint.is_finite() {
            options.frequency_hint
        } else {
            0.0
        };

        let key = self.cache.as_ref().map(|_| CacheKey {
            query: query.raw.clone(),
            algorithm: self.strategy.algorithm(),
            languages: self.languages.clone(),
            limit,
            spellcheck,
            frequency_hint: hint.to_bits(),
        });
        if let (Some(cache), Some(key)) = (&self.cache, &key)
            && let Some(hit) = cache.get(key)
        {
            debug!(query = %query.raw, "cache_hit");
            return hit;
        }

        let candidates = self.compute(&query, limit, spellcheck, hint);

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.put(key, candidates.clone());
        }
        candidates
    }

    fn compute(
        &self,
        query: &NormalizedQuery,
        limit: usize,
        spellcheck: bool,
        hint: f64,
    ) -> Vec<Candidate> {
        let code_point = parse_code_point(&query.raw);
        if let Some(cp) = code_point
            && cp.exclusive
        {
            debug!(query = %query.raw, code_point = cp.ch as u32, "codepoint_fast_path");
            return vec![self.code_point_candidate(cp, hint)];
        }

        if self.index.find(&query.raw).is_some() {
            debug!(phrase = %query.raw, "similar_query");
            return self.similar(&query.raw, Some(limit), Some(true));
        }

        if query.is_empty() {
            return Vec::new();
        }

        let mut tokens = query.tokens.clone();
        if !query.tones.is_empty() {
            debug!(tones = ?query.tones, words = query.tokens.len(), "tone_query");
            if query.tokens.is_empty() {
                return self.tone_modifiers(query, limit, hint);
            }
            let toned = self.toned_candidates(query, limit, spellcheck, hint);
            if !toned.is_empty() {
                return toned;
            }
            tokens = query.tokens_with_tone_words();
        }

        let terms = self.terms(&tokens, spellcheck, hint);
        let matches = self.strategy.search(&self.index, &terms);
        let mut candidates = CandidateRanker::new(limit).rank(&self.index, matches);

        if let Some(cp) = code_point
            && candidates.len() < limit
            && !candidates.iter().any(|c| c.phrase.chars().eq(std::iter::once(cp.ch)))
        {
            candidates.push(self.code_point_candidate(cp, hint));
        }
        candidates
    }

    fn terms(&self, tokens: &[String], spellcheck: bool, hint: f64) -> SearchTerms {
        let terms = SearchTerms::new(tokens).with_frequency_hint(hint);
        if spellcheck {
            terms.with_suggestions(self.spellchecker.as_ref())
        } else {
            terms
        }
    }

    fn code_point_candidate(&self, cp: CodePointQuery, hint: f64) -> Candidate {
        let phrase = cp.ch.to_string();
        let name = self
            .index
            .find(&phrase)
            .and_then(|id| self.index.display_name(id));
        Candidate::new(phrase, code_point_comment(cp.ch, name), hint)
    }

    fn tone_modifiers(&self, query: &NormalizedQuery, limit: usize, hint: f64) -> Vec<Candidate> {
        let detail = MatchDetail {
            echo: Some(query.echo()),
            ..MatchDetail::default()
        };
        query
            .tones
            .iter()
            .take(limit)
            .map(|tone| {
                let name = self
                    .index
                    .modifier_entry(*tone)
                    .and_then(|id| self.index.display_name(id))
                    .unwrap_or(tone.english_name());
                Candidate::new(
                    tone.modifier().to_string(),
                    assemble_comment(name, &detail),
                    hint,
                )
            })
            .collect()
    }

    fn toned_candidates(
        &self,
        query: &NormalizedQuery,
        limit: usize,
        spellcheck: bool,
        hint: f64,
    ) -> Vec<Candidate> {
        let terms = self.terms(&query.tokens, spellcheck, hint);
        let mut matches: Vec<_> = self
            .strategy
            .search(&self.index, &terms)
            .into_iter()
            .filter(|m| self.index.supports_tones(m.entry))
            .collect();
        sort_matches(&mut matches);

        let mut out: Vec<Candidate> = Vec::new();
        for m in matches {
            if out.len() >= limit {
                break;
            }
            let Some(slots) = self.index.tone_slots(m.entry) else {
                continue;
            };
            let base = self.index.entry(m.entry);
            let assignment = assign_tones(&query.tones, slots.len());
            let phrase = compose_phrase(&base.phrase, slots, &assignment);
            if out.iter().any(|c| c.phrase == phrase) {
                continue;
            }

            let tier = &self.index.tiers()[m.tier];
            let name = self
                .index
                .find(&phrase)
                .and_then(|id| tier.row(id))
                .map(|row| row.display_name(&phrase).to_string())
                .unwrap_or_else(|| {
                    let base_name = tier
                        .row(m.entry)
                        .map_or(base.phrase.as_str(), |row| row.display_name(&base.phrase));
                    variant_name(base_name, &assignment, |tone| {
                        self.index.tone_name(tone, &tier.language)
                    })
                });
            let detail = MatchDetail {
                echo: Some(query.echo()),
                ..m.detail
            };
            out.push(Candidate::new(phrase, assemble_comment(&name, &detail), m.score));
        }
        out
    }

    pub fn similar(
        &self,
        phrase: &str,
        match_limit: Option<usize>,
        show_keywords: Option<bool>,
    ) -> Vec<Candidate> {
        similar(
            &self.index,
            phrase.trim(),
            match_limit.unwrap_or(self.config.match_limit),
            show_keywords.unwrap_or(true),
        )
    }
}
