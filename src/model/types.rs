//! Normalized entry and candidate structs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Localized label data for one entry in one language.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Annotation {
    /// Canonical short name (CLDR "tts" name), e.g. "smiling face with sunglasses".
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// True when neither the name nor any keyword carries text.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.keywords.iter().all(|k| k.trim().is_empty())
    }
}

/// One emoji, emoji sequence, or plain Unicode character with its metadata.
///
/// The phrase is the identity of an entry. Annotations are keyed by language
/// tag in underscore form (`en`, `en_US`, `de_CH`, `zh_Hant`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub phrase: String,
    /// Emoji group, e.g. "people" or "flags".
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub subgroup: Option<String>,
    /// Two-letter Unicode general category code ("So", "Sc", "Lu").
    #[serde(default)]
    pub general_category: Option<String>,
    /// Unicode version that introduced the phrase, e.g. "6.0".
    #[serde(default)]
    pub unicode_version: Option<String>,
    /// Whether the entry accepts Fitzpatrick skin-tone modifiers.
    #[serde(default)]
    pub skin_tones: bool,
    /// Whether the phrase is a single modifier base character, used when
    /// deciding where a modifier goes inside a ZWJ sequence.
    #[serde(default)]
    pub modifier_base: bool,
    #[serde(default)]
    pub annotations: BTreeMap<String, Annotation>,
}

impl Entry {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group: &str, subgroup: &str) -> Self {
        self.group = Some(group.to_string());
        self.subgroup = Some(subgroup.to_string());
        self
    }

    pub fn with_category(mut self, general_category: &str) -> Self {
        self.general_category = Some(general_category.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.unicode_version = Some(version.to_string());
        self
    }

    /// Mark the entry as accepting skin tones. Single-character entries are
    /// also modifier bases.
    pub fn with_skin_tones(mut self) -> Self {
        self.skin_tones = true;
        self.modifier_base = self.is_single_character();
        self
    }

    /// True when a Fitzpatrick modifier can follow this phrase directly:
    /// flagged explicitly, or a tone-accepting single character.
    pub fn is_modifier_base(&self) -> bool {
        self.modifier_base || (self.skin_tones && self.is_single_character())
    }

    fn is_single_character(&self) -> bool {
        self.phrase.chars().filter(|c| *c != '\u{FE0F}').count() == 1
    }

    pub fn annotate(mut self, language: &str, name: &str, keywords: &[&str]) -> Self {
        self.annotations
            .insert(language.to_string(), Annotation::new(name, keywords));
        self
    }

    pub fn annotation(&self, language: &str) -> Option<&Annotation> {
        self.annotations.get(language).filter(|a| !a.is_blank())
    }

    /// Major Unicode version, used as the `ucN` similarity label.
    pub fn unicode_major(&self) -> Option<u32> {
        self.unicode_version
            .as_deref()
            .and_then(|v| v.split('.').next())
            .and_then(|major| major.trim().parse().ok())
    }
}

/// One ranked result row handed back to the input method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub phrase: String,
    /// Human-readable annotation: name, synthetic echo, matched keywords,
    /// matched categories.
    pub comment: String,
    pub score: f64,
}

impl Candidate {
    pub fn new(phrase: impl Into<String>, comment: impl Into<String>, score: f64) -> Self {
        Self {
            phrase: phrase.into(),
            comment: comment.into(),
            score,
        }
    }
}
