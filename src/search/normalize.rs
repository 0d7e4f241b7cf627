//! Token normalization shared by index construction and query parsing.
//!
//! Both sides run the same pipeline, so a keyword and a typed query word
//! that look alike always produce the same key:
//!
//! 1. **Separator unification** - whitespace (including U+3000), `_` and
//!    fullwidth `＿` all split words
//! 2. **Edge punctuation trimming** - `flag:` and `(burma)` become `flag`
//!    and `burma`; words made only of symbols are kept as written
//! 3. **Unicode NFC normalization**
//! 4. **Full case folding** - lowercase, `ß`/`ẞ` to `ss`, final sigma to `σ`
//! 5. **Diacritic folding** - combining marks U+0300..U+036F are removed,
//!    so `sàimǎ` matches `saima` and `café` matches `cafe`

use smallvec::SmallVec;
use unicode_normalization::UnicodeNormalization;

use crate::model::SkinTone;

pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '_' || c == '\u{FF3F}'
}

/// Split raw text into words on every separator.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|w| !w.is_empty())
}

fn trim_edge_punctuation(word: &str) -> &str {
    let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() { word } else { trimmed }
}

/// NFC plus full case folding.
pub fn fold_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc().flat_map(char::to_lowercase) {
        match c {
            'ß' => out.push_str("ss"),
            'ς' => out.push('σ'),
            other => out.push(other),
        }
    }
    out
}

fn is_foldable_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

pub fn strip_diacritics(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    text.nfd().filter(|c| !is_foldable_mark(*c)).nfc().collect()
}

/// Matching key for a single word.
pub fn match_key(word: &str) -> String {
    strip_diacritics(&fold_case(trim_edge_punctuation(word)))
}

/// Matching keys for every word of a label, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    split_words(text)
        .map(match_key)
        .filter(|k| !k.is_empty())
        .collect()
}

/// Matching key for a whole label: its tokens joined by single spaces.
pub fn phrase_key(text: &str) -> String {
    tokenize(text).join(" ")
}

/// A typed query after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// The query with surrounding whitespace removed.
    pub raw: String,
    /// Case-folded words as typed, tone words included; used for echoes.
    pub words: Vec<String>,
    /// Distinct matching keys of the non-tone words, in typed order.
    pub tokens: Vec<String>,
    /// Distinct skin tones requested with `tone1`..`tone5`, in typed order.
    pub tones: SmallVec<[SkinTone; 2]>,
}

impl NormalizedQuery {
    pub fn parse(query: &str) -> Self {
        let raw = query.trim().to_string();
        let mut words = Vec::new();
        let mut tokens: Vec<String> = Vec::new();
        let mut tones: SmallVec<[SkinTone; 2]> = SmallVec::new();

        for word in split_words(&raw) {
            let key = match_key(word);
            if key.is_empty() {
                continue;
            }
            words.push(fold_case(trim_edge_punctuation(word)));
            if let Some(tone) = SkinTone::from_token(&key) {
                if !tones.contains(&tone) {
                    tones.push(tone);
                }
            } else if !tokens.contains(&key) {
                tokens.push(key);
            }
        }

        Self {
            raw,
            words,
            tokens,
            tones,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.tones.is_empty()
    }

    /// Keys of the non-tone words joined by spaces.
    pub fn phrase_key(&self) -> String {
        self.tokens.join(" ")
    }

    /// The query as shown inside “…” in comments.
    pub fn echo(&self) -> String {
        self.words.join(" ")
    }

    /// Tokens with tone words put back as plain keywords, for the fallback
    /// when no tone-capable entry matched.
    pub fn tokens_with_tone_words(&self) -> Vec<String> {
        let mut tokens = self.tokens.clone();
        tokens.extend(self.tones.iter().map(|t| t.token().to_string()));
        tokens
    }
}
