//! Language tag handling and tier expansion.

/// Canonical underscore form of a tag: `en-US` and `en_US` both give `en_US`.
pub fn canonical_tag(tag: &str) -> String {
    tag.trim().replace('-', "_")
}

/// Language part of a tag: `de_CH` gives `de`.
pub fn base_language(tag: &str) -> &str {
    tag.split(['_', '-']).next().unwrap_or(tag)
}

pub fn is_english(tag: &str) -> bool {
    base_language(tag) == "en"
}

/// Expand configured tags into the ordered tier list used for lookups.
///
/// Each tag is followed by its progressively shorter parents
/// (`sr_Latn_RS`, `sr_Latn`, `sr`), English is always last, and repeated
/// tags keep their first position. No configured languages means English.
pub fn expand_languages<S: AsRef<str>>(configured: &[S]) -> Vec<String> {
    let mut tiers: Vec<String> = Vec::new();
    let mut push = |tag: String| {
        if !tag.is_empty() && !tiers.contains(&tag) {
            tiers.push(tag);
        }
    };

    for tag in configured {
        let tag = canonical_tag(tag.as_ref());
        let parts: Vec<&str> = tag.split('_').filter(|p| !p.is_empty()).collect();
        for len in (1..=parts.len()).rev() {
            push(parts[..len].join("_"));
        }
    }
    push("en".to_string());
    tiers
}
