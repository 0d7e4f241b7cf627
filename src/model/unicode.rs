//! Static Unicode tables: Fitzpatrick modifiers, sequence joiners,
//! regional indicators and general-category labels.

use serde::{Deserialize, Serialize};

pub const ZWJ: char = '\u{200D}';
pub const VS16: char = '\u{FE0F}';

const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;
const REGIONAL_INDICATOR_Z: u32 = 0x1F1FF;

/// The five Fitzpatrick skin-tone modifiers, U+1F3FB through U+1F3FF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkinTone {
    Light,
    MediumLight,
    Medium,
    MediumDark,
    Dark,
}

impl SkinTone {
    pub const ALL: [SkinTone; 5] = [
        SkinTone::Light,
        SkinTone::MediumLight,
        SkinTone::Medium,
        SkinTone::MediumDark,
        SkinTone::Dark,
    ];

    /// Query token selecting this tone (`tone1` .. `tone5`).
    pub fn token(self) -> &'static str {
        match self {
            SkinTone::Light => "tone1",
            SkinTone::MediumLight => "tone2",
            SkinTone::Medium => "tone3",
            SkinTone::MediumDark => "tone4",
            SkinTone::Dark => "tone5",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tone| tone.token() == token)
    }

    pub fn modifier(self) -> char {
        match self {
            SkinTone::Light => '\u{1F3FB}',
            SkinTone::MediumLight => '\u{1F3FC}',
            SkinTone::Medium => '\u{1F3FD}',
            SkinTone::MediumDark => '\u{1F3FE}',
            SkinTone::Dark => '\u{1F3FF}',
        }
    }

    pub fn from_modifier(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|tone| tone.modifier() == c)
    }

    /// English CLDR name, used when the modifier character has no
    /// annotation in the requested language.
    pub fn english_name(self) -> &'static str {
        match self {
            SkinTone::Light => "light skin tone",
            SkinTone::MediumLight => "medium-light skin tone",
            SkinTone::Medium => "medium skin tone",
            SkinTone::MediumDark => "medium-dark skin tone",
            SkinTone::Dark => "dark skin tone",
        }
    }
}

pub fn is_skin_tone_modifier(c: char) -> bool {
    SkinTone::from_modifier(c).is_some()
}

pub fn is_regional_indicator(c: char) -> bool {
    (REGIONAL_INDICATOR_A..=REGIONAL_INDICATOR_Z).contains(&(c as u32))
}

/// Region code spelled by a flag made of exactly two regional indicators,
/// lowercased: 🇺🇸 gives `us`.
pub fn flag_region_code(phrase: &str) -> Option<String> {
    let mut chars = phrase.chars();
    let (a, b) = (chars.next()?, chars.next()?);
    if chars.next().is_some() || !is_regional_indicator(a) || !is_regional_indicator(b) {
        return None;
    }
    let letter = |c: char| char::from_u32(c as u32 - REGIONAL_INDICATOR_A + u32::from(b'a'));
    Some([letter(a)?, letter(b)?].iter().collect())
}

/// Drop every U+FE0F so that text-presentation and emoji-presentation
/// spellings of a phrase share one lookup key.
pub fn strip_variation_selectors(phrase: &str) -> String {
    phrase.chars().filter(|c| *c != VS16).collect()
}

/// English words for a two-letter general category code: the major class
/// and, where one reads naturally, the minor class. `Sc` is Symbol/Currency.
pub fn general_category_labels(code: &str) -> (Option<&'static str>, Option<&'static str>) {
    let major = match code.chars().next() {
        Some('L') => Some("Letter"),
        Some('M') => Some("Mark"),
        Some('N') => Some("Number"),
        Some('P') => Some("Punctuation"),
        Some('S') => Some("Symbol"),
        Some('Z') => Some("Separator"),
        Some('C') => Some("Other"),
        _ => None,
    };
    let minor = match code {
        "Lu" => Some("Uppercase"),
        "Ll" => Some("Lowercase"),
        "Lt" => Some("Titlecase"),
        "Lm" | "Sk" => Some("Modifier"),
        "Nd" => Some("Decimal"),
        "Nl" => Some("Letter"),
        "Pc" => Some("Connector"),
        "Pd" => Some("Dash"),
        "Ps" => Some("Open"),
        "Pe" => Some("Close"),
        "Pi" => Some("Initial"),
        "Pf" => Some("Final"),
        "Sm" => Some("Math"),
        "Sc" => Some("Currency"),
        "Zs" => Some("Space"),
        "Cc" => Some("Control"),
        "Cf" => Some("Format"),
        _ => None,
    };
    (major, minor)
}
