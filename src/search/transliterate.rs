//! Pluggable transliteration per language.
//!
//! Transliterations become extra matchable keywords at index time and are
//! echoed as “sàimǎ” when they are what matched. With no transliterator
//! registered for a language, that language simply gets no extra keywords.

use std::sync::Arc;

use fxhash::FxHashMap;

use crate::annotations::language::base_language;

/// Converts a keyword into alternative spellings (romanizations, kana).
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, text: &str) -> Vec<String>;
}

/// Transliterator that never produces anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransliteration;

impl Transliterator for NoTransliteration {
    fn transliterate(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Katakana to hiragana, so `ねこ` finds an entry annotated `ネコ`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KanaTransliterator;

const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
const KANA_OFFSET: u32 = 0x60;

impl Transliterator for KanaTransliterator {
    fn transliterate(&self, text: &str) -> Vec<String> {
        let hiragana: String = text
            .chars()
            .map(|c| {
                let cp = c as u32;
                if (KATAKANA_START..=KATAKANA_END).contains(&cp) {
                    char::from_u32(cp - KANA_OFFSET).unwrap_or(c)
                } else {
                    c
                }
            })
            .collect();
        if hiragana == text {
            Vec::new()
        } else {
            vec![hiragana]
        }
    }
}

/// Transliterators keyed by language tag or base language.
#[derive(Clone, Default)]
pub struct TransliterationRegistry {
    by_language: FxHashMap<String, Arc<dyn Transliterator>>,
}

impl std::fmt::Debug for TransliterationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut languages: Vec<_> = self.by_language.keys().collect();
        languages.sort();
        f.debug_struct("TransliterationRegistry")
            .field("languages", &languages)
            .finish()
    }
}

impl TransliterationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the transliterators that need no external data.
    pub fn builtin() -> Self {
        Self::new().with("ja", Arc::new(KanaTransliterator))
    }

    pub fn with(mut self, language: &str, transliterator: Arc<dyn Transliterator>) -> Self {
        self.register(language, transliterator);
        self
    }

    pub fn register(&mut self, language: &str, transliterator: Arc<dyn Transliterator>) {
        self.by_language.insert(language.to_string(), transliterator);
    }

    /// The transliterator for an exact tag, else for its base language.
    pub fn for_language(&self, language: &str) -> Option<&dyn Transliterator> {
        self.by_language
            .get(language)
            .or_else(|| self.by_language.get(base_language(language)))
            .map(|t| t.as_ref())
    }

    /// Distinct non-empty transliterations of `text` that differ from it.
    pub fn expand(&self, language: &str, text: &str) -> Vec<String> {
        let Some(transliterator) = self.for_language(language) else {
            return Vec::new();
        };
        let mut out: Vec<String> = Vec::new();
        for candidate in transliterator.transliterate(text) {
            let candidate = candidate.trim().to_string();
            if !candidate.is_empty() && candidate != text && !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}
