//! Fitzpatrick skin-tone composition.
//!
//! A modifier goes right after each person in a sequence: after the single
//! character of a plain modifier base (`👋` to `👋🏽`), and after every ZWJ
//! component that is itself a modifier base (`🧑‍🤝‍🧑` to `🧑🏻‍🤝‍🧑🏿`). A U+FE0F
//! directly following the toned character is dropped.
//!
//! Two distinct requested tones on a sequence with two or more people tone
//! each person independently, in order; otherwise one tone applies to all.

use smallvec::{SmallVec, smallvec};

use crate::model::SkinTone;
use crate::model::unicode::{VS16, ZWJ, strip_variation_selectors};

/// ZWJ component indices that receive a modifier.
pub type ToneSlots = SmallVec<[usize; 4]>;

/// Tone per slot after assignment.
pub type ToneAssignment = SmallVec<[SkinTone; 4]>;

/// 🤝 between two people links them and stays untoned.
const HANDSHAKE: &str = "\u{1F91D}";

/// Where modifiers go in `phrase`.
///
/// `is_modifier_base` is asked about each ZWJ component with variation
/// selectors removed. When no component qualifies, the first one is toned.
pub fn tone_slots(phrase: &str, is_modifier_base: impl Fn(&str) -> bool) -> ToneSlots {
    let components: Vec<&str> = phrase.split(ZWJ).collect();
    let multi = components.len() > 1;
    let slots: ToneSlots = components
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            let bare = strip_variation_selectors(c);
            !(multi && bare == HANDSHAKE) && is_modifier_base(&bare)
        })
        .map(|(i, _)| i)
        .collect();
    if slots.is_empty() { smallvec![0] } else { slots }
}

/// Spread requested tones over `slot_count` people.
pub fn assign_tones(tones: &[SkinTone], slot_count: usize) -> ToneAssignment {
    let Some(&first) = tones.first() else {
        return SmallVec::new();
    };
    if tones.len() >= 2 && slot_count >= 2 {
        (0..slot_count)
            .map(|i| tones[i.min(tones.len() - 1)])
            .collect()
    } else {
        smallvec![first; slot_count.max(1)]
    }
}

/// Insert modifiers into `phrase` following `assignment` slot by slot.
pub fn compose_phrase(phrase: &str, slots: &[usize], assignment: &[SkinTone]) -> String {
    let mut out = String::with_capacity(phrase.len() + assignment.len() * 4);
    for (i, component) in phrase.split(ZWJ).enumerate() {
        if i > 0 {
            out.push(ZWJ);
        }
        let tone = slots
            .iter()
            .position(|s| *s == i)
            .and_then(|pos| assignment.get(pos));
        match tone {
            Some(tone) => {
                let mut chars = component.chars();
                if let Some(first) = chars.next() {
                    out.push(first);
                    out.push(tone.modifier());
                    let rest = chars.as_str();
                    out.push_str(rest.strip_prefix(VS16).unwrap_or(rest));
                }
            }
            None => out.push_str(component),
        }
    }
    out
}

/// Distinct tones of an assignment in order of appearance.
pub fn distinct_tones(assignment: &[SkinTone]) -> SmallVec<[SkinTone; 2]> {
    let mut out = SmallVec::new();
    for tone in assignment {
        if !out.contains(tone) {
            out.push(*tone);
        }
    }
    out
}

/// `base: tone name[, tone name]`.
pub fn variant_name(
    base_name: &str,
    assignment: &[SkinTone],
    tone_name: impl Fn(SkinTone) -> String,
) -> String {
    let tones: Vec<String> = distinct_tones(assignment).into_iter().map(tone_name).collect();
    if tones.is_empty() {
        base_name.to_string()
    } else {
        format!("{base_name}: {}", tones.join(", "))
    }
}

/// Every tone assignment generated ahead of time for an entry: the five
/// uniform ones, plus the twenty mixed pairs for two-person sequences.
pub fn variant_assignments(slot_count: usize) -> Vec<ToneAssignment> {
    let mut out: Vec<ToneAssignment> = SkinTone::ALL
        .iter()
        .map(|tone| assign_tones(&[*tone], slot_count))
        .collect();
    if slot_count == 2 {
        for a in SkinTone::ALL {
            for b in SkinTone::ALL {
                if a != b {
                    out.push(smallvec![a, b]);
                }
            }
        }
    }
    out
}
