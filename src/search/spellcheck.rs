//! Pluggable spelling correction for query words.

use std::collections::BTreeSet;

use crate::search::normalize::match_key;

/// Suggests corrected spellings for a single word.
pub trait SpellChecker: Send + Sync {
    fn suggest(&self, word: &str) -> Vec<String>;
}

/// Spell checker that never suggests anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpellCheck;

impl SpellChecker for NoSpellCheck {
    fn suggest(&self, _word: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Suggests words from a fixed vocabulary within a small edit distance.
#[derive(Debug, Clone, Default)]
pub struct WordListSpellChecker {
    words: Vec<String>,
    max_distance: usize,
    max_suggestions: usize,
}

impl WordListSpellChecker {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: BTreeSet<String> = words
            .into_iter()
            .map(|w| match_key(w.as_ref()))
            .filter(|w| w.chars().count() >= 3)
            .collect();
        Self {
            words: words.into_iter().collect(),
            max_distance: 2,
            max_suggestions: 3,
        }
    }

    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }
}

impl SpellChecker for WordListSpellChecker {
    fn suggest(&self, word: &str) -> Vec<String> {
        let word = match_key(word);
        if word.chars().count() < 3 || self.words.binary_search(&word).is_ok() {
            return Vec::new();
        }
        let mut scored: Vec<(usize, &String)> = self
            .words
            .iter()
            .filter_map(|candidate| {
                let distance = strsim::damerau_levenshtein(&word, candidate);
                (distance <= self.max_distance).then_some((distance, candidate))
            })
            .collect();
        scored.sort();
        scored
            .into_iter()
            .take(self.max_suggestions)
            .map(|(_, w)| w.clone())
            .collect()
    }
}
