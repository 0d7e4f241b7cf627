//! In-memory annotation index.
//!
//! Entries are stored once; each language tier holds the labels of every
//! entry annotated in exactly that tag plus an inverted token index. Tiers
//! are never merged, so `de_CH` and `de` stay separately ranked.
//!
//! Build steps:
//!
//! 1. Drop entries with empty or repeated phrases
//! 2. Generate skin-tone variants for entries that accept tones
//! 3. Per tier, derive labels: name, keywords, synthetic keys (flag region
//!    codes, transliterations) and, in English tiers, category labels
//! 4. Record every label token in the tier's sorted token map

use std::collections::BTreeMap;
use std::time::Instant;

use fxhash::FxHashMap;
use itertools::Itertools;
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::annotations::language::{base_language, is_english};
use crate::model::unicode::{
    flag_region_code, general_category_labels, is_skin_tone_modifier, strip_variation_selectors,
};
use crate::model::{Annotation, Entry, SkinTone};
use crate::search::normalize::{phrase_key, tokenize};
use crate::search::skin_tone::{
    ToneSlots, compose_phrase, tone_slots, variant_assignments, variant_name,
};
use crate::search::transliterate::TransliterationRegistry;

pub type EntryId = usize;

/// One matchable label with its normalized forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// As written in the data.
    pub text: String,
    /// Tokens joined by single spaces.
    pub key: String,
    pub tokens: Vec<String>,
}

impl Label {
    pub fn new(text: &str) -> Self {
        let tokens = tokenize(text);
        Self {
            text: text.trim().to_string(),
            key: tokens.join(" "),
            tokens,
        }
    }

    /// Category names also split on `-` (`animal-mammal`).
    fn category(text: &str) -> Self {
        let tokens: Vec<String> = tokenize(&text.replace('-', " "));
        Self {
            text: text.trim().to_string(),
            key: tokens.join(" "),
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Labels of one entry in one language.
#[derive(Debug, Clone, Default)]
pub struct TierRow {
    pub name: Option<Label>,
    pub keywords: Vec<Label>,
    /// Derived keys shown as “echo” when they are what matched.
    pub synthetic: Vec<Label>,
    pub categories: Vec<Label>,
    /// Every token of every label, sorted and distinct.
    pub tokens: Vec<String>,
    /// Labels compared by similarity search, in comment order, distinct by
    /// identity: the phrase, then (English tiers) the general category,
    /// group, subgroup and `ucN`, then name, keywords and synthetic keys.
    pub similarity: Vec<SimilarityLabel>,
    /// Identities of `similarity`, sorted.
    similarity_keys: Vec<String>,
}

/// A label as shown and compared by similarity search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityLabel {
    pub text: String,
    /// Normalized key; the text itself when it has no matching key.
    pub identity: String,
}

impl SimilarityLabel {
    fn new(text: String) -> Self {
        let key = phrase_key(&text);
        let identity = if key.is_empty() { text.clone() } else { key };
        Self { text, identity }
    }

    fn from_label(label: &Label) -> Self {
        Self {
            text: label.text.clone(),
            identity: label.key.clone(),
        }
    }
}

impl TierRow {
    pub fn display_name<'a>(&'a self, phrase: &'a str) -> &'a str {
        self.name.as_ref().map_or(phrase, |n| n.text.as_str())
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.binary_search_by(|t| t.as_str().cmp(token)).is_ok()
    }

    pub fn shares_label(&self, identity: &str) -> bool {
        self.similarity_keys
            .binary_search_by(|k| k.as_str().cmp(identity))
            .is_ok()
    }

    /// True if some token is longer than and starts with `prefix`.
    pub fn has_proper_prefix(&self, prefix: &str) -> bool {
        let start = self.tokens.partition_point(|t| t.as_str() < prefix);
        self.tokens[start..]
            .iter()
            .take_while(|t| t.starts_with(prefix))
            .any(|t| t.len() > prefix.len())
    }

    /// Name, keyword and synthetic labels, in that order.
    pub fn text_labels(&self) -> impl Iterator<Item = (LabelKind, &Label)> {
        self.name
            .iter()
            .map(|l| (LabelKind::Name, l))
            .chain(self.keywords.iter().map(|l| (LabelKind::Keyword, l)))
            .chain(self.synthetic.iter().map(|l| (LabelKind::Synthetic, l)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Name,
    Keyword,
    Synthetic,
}

/// All labels for one language tag.
#[derive(Debug, Clone)]
pub struct Tier {
    pub language: String,
    pub english: bool,
    rows: Vec<Option<TierRow>>,
    tokens: BTreeMap<String, Vec<EntryId>>,
}

impl Tier {
    pub fn row(&self, id: EntryId) -> Option<&TierRow> {
        self.rows.get(id).and_then(Option::as_ref)
    }

    pub fn rows(&self) -> impl Iterator<Item = (EntryId, &TierRow)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(id, row)| row.as_ref().map(|r| (id, r)))
    }

    /// Entries carrying `token` exactly, ascending.
    pub fn exact(&self, token: &str) -> &[EntryId] {
        self.tokens.get(token).map_or(&[], Vec::as_slice)
    }

    /// Entries carrying a token that starts with `prefix`.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = EntryId> + 'a {
        self.tokens
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(t, _)| t.starts_with(prefix))
            .flat_map(|(_, ids)| ids.iter().copied())
    }
}

/// The full multilingual index.
#[derive(Debug, Clone)]
pub struct AnnotationIndex {
    entries: Vec<Entry>,
    tiers: Vec<Tier>,
    by_phrase: FxHashMap<String, EntryId>,
    by_bare_phrase: FxHashMap<String, EntryId>,
    tone_slots: FxHashMap<EntryId, ToneSlots>,
    generated: usize,
}

impl AnnotationIndex {
    /// Build the index for already-expanded language tiers.
    pub fn build(
        entries: Vec<Entry>,
        tiers: &[String],
        transliteration: &TransliterationRegistry,
    ) -> Self {
        let started = Instant::now();
        let mut index = Self {
            entries: Vec::with_capacity(entries.len()),
            tiers: Vec::new(),
            by_phrase: FxHashMap::default(),
            by_bare_phrase: FxHashMap::default(),
            tone_slots: FxHashMap::default(),
            generated: 0,
        };

        for entry in entries {
            if entry.phrase.is_empty() {
                warn!("skipping entry with empty phrase");
                continue;
            }
            if index.by_phrase.contains_key(&entry.phrase) {
                warn!(phrase = %entry.phrase, "skipping duplicate entry");
                continue;
            }
            index.insert(entry);
        }

        index.generate_tone_variants();

        index.tiers = tiers
            .iter()
            .map(|language| index.build_tier(language, transliteration))
            .collect();

        info!(
            entries = index.entries.len(),
            generated = index.generated,
            tiers = ?tiers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "index_built"
        );
        index
    }

    fn insert(&mut self, entry: Entry) -> EntryId {
        let id = self.entries.len();
        self.by_phrase.insert(entry.phrase.clone(), id);
        self.by_bare_phrase
            .entry(strip_variation_selectors(&entry.phrase))
            .or_insert(id);
        self.entries.push(entry);
        id
    }

    fn generate_tone_variants(&mut self) {
        let base_count = self.entries.len();
        for id in 0..base_count {
            if !self.entries[id].skin_tones {
                continue;
            }
            let slots = tone_slots(&self.entries[id].phrase, |component| {
                self.find(component)
                    .is_some_and(|c| self.entries[c].is_modifier_base())
            });
            for assignment in variant_assignments(slots.len()) {
                let phrase = compose_phrase(&self.entries[id].phrase, &slots, &assignment);
                if self.by_phrase.contains_key(&phrase) {
                    continue;
                }
                let variant = self.tone_variant(id, phrase, &assignment);
                self.insert(variant);
                self.generated += 1;
            }
            self.tone_slots.insert(id, slots);
        }
    }

    fn tone_variant(
        &self,
        base: EntryId,
        phrase: String,
        assignment: &[SkinTone],
    ) -> Entry {
        let entry = &self.entries[base];
        let annotations = entry
            .annotations
            .iter()
            .filter(|(_, a)| !a.is_blank())
            .map(|(language, annotation)| {
                let tone_name = |tone| self.tone_name(tone, language);
                let mut keywords = annotation.keywords.clone();
                for tone in assignment {
                    let name = tone_name(*tone);
                    if !keywords.contains(&name) {
                        keywords.push(name);
                    }
                }
                let name = variant_name(&annotation.name, assignment, tone_name);
                (language.clone(), Annotation { name, keywords })
            })
            .collect();
        Entry {
            phrase,
            group: entry.group.clone(),
            subgroup: entry.subgroup.clone(),
            general_category: entry.general_category.clone(),
            unicode_version: entry.unicode_version.clone(),
            skin_tones: false,
            modifier_base: false,
            annotations,
        }
    }

    /// Localized name of a tone: the modifier character's own annotation in
    /// `language` or its base language, else the English CLDR name.
    pub fn tone_name(&self, tone: SkinTone, language: &str) -> String {
        self.find(&tone.modifier().to_string())
            .and_then(|id| {
                let entry = &self.entries[id];
                entry
                    .annotation(language)
                    .or_else(|| entry.annotation(base_language(language)))
            })
            .map(|a| a.name.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| tone.english_name().to_string())
    }

    fn build_tier(&self, language: &str, transliteration: &TransliterationRegistry) -> Tier {
        let english = is_english(language);
        let mut tokens: BTreeMap<String, Vec<EntryId>> = BTreeMap::new();
        let rows: Vec<Option<TierRow>> = self
            .entries
            .iter()
            .enumerate()
            .map(|(id, entry)| {
                let row = build_row(entry, language, english, transliteration)?;
                for token in &row.tokens {
                    let ids = tokens.entry(token.clone()).or_default();
                    if ids.last() != Some(&id) {
                        ids.push(id);
                    }
                }
                Some(row)
            })
            .collect();
        Tier {
            language: language.to_string(),
            english,
            rows,
            tokens,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of skin-tone variants generated at build time.
    pub fn generated_variants(&self) -> usize {
        self.generated
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Look up an entry by phrase, tolerating missing or extra U+FE0F.
    pub fn find(&self, phrase: &str) -> Option<EntryId> {
        self.by_phrase
            .get(phrase)
            .or_else(|| self.by_bare_phrase.get(&strip_variation_selectors(phrase)))
            .copied()
    }

    /// Name from the first tier that annotates the entry.
    pub fn display_name(&self, id: EntryId) -> Option<&str> {
        self.tiers
            .iter()
            .find_map(|tier| tier.row(id).and_then(|r| r.name.as_ref()))
            .map(|l| l.text.as_str())
    }

    pub fn supports_tones(&self, id: EntryId) -> bool {
        self.tone_slots.contains_key(&id)
    }

    pub fn tone_slots(&self, id: EntryId) -> Option<&ToneSlots> {
        self.tone_slots.get(&id)
    }

    /// The entry for a bare modifier character, when the data has one.
    pub fn modifier_entry(&self, tone: SkinTone) -> Option<EntryId> {
        self.find(&tone.modifier().to_string())
            .filter(|id| self.entries[*id].phrase.chars().all(is_skin_tone_modifier))
    }
}

fn build_row(
    entry: &Entry,
    language: &str,
    english: bool,
    transliteration: &TransliterationRegistry,
) -> Option<TierRow> {
    let annotation = entry.annotation(language)?;
    let mut row = TierRow::default();

    let name = Label::new(&annotation.name);
    let mut seen: SmallVec<[String; 16]> = SmallVec::new();
    if !name.is_empty() {
        seen.push(name.key.clone());
        row.name = Some(name);
    }
    for keyword in &annotation.keywords {
        let label = Label::new(keyword);
        if !label.is_empty() && !seen.contains(&label.key) {
            seen.push(label.key.clone());
            row.keywords.push(label);
        }
    }

    if let Some(code) = flag_region_code(&entry.phrase) {
        for key in [code.clone(), format!("flag {code}")] {
            let label = Label::new(&key);
            if !seen.contains(&label.key) {
                seen.push(label.key.clone());
                row.synthetic.push(label);
            }
        }
    }

    let sources: Vec<String> = row
        .name
        .iter()
        .chain(row.keywords.iter())
        .map(|l| l.text.clone())
        .collect();
    for text in sources {
        for alternative in transliteration.expand(language, &text) {
            let label = Label::new(&alternative);
            if !label.is_empty() && !seen.contains(&label.key) {
                seen.push(label.key.clone());
                row.synthetic.push(label);
            }
        }
    }

    if english {
        row.categories = category_labels(entry);
    }

    let mut tokens: Vec<String> = row
        .text_labels()
        .map(|(_, l)| l)
        .chain(row.categories.iter())
        .flat_map(|l| l.tokens.iter().cloned())
        .collect();
    tokens.sort();
    tokens.dedup();
    row.tokens = tokens;

    row.similarity = similarity_labels(entry, english, &row);
    let mut keys: Vec<String> = row.similarity.iter().map(|l| l.identity.clone()).collect();
    keys.sort_unstable();
    row.similarity_keys = keys;
    Some(row)
}

fn similarity_labels(entry: &Entry, english: bool, row: &TierRow) -> Vec<SimilarityLabel> {
    let mut metadata = vec![entry.phrase.clone()];
    if english {
        metadata.extend(entry.general_category.iter().cloned());
        metadata.extend(entry.group.iter().cloned());
        metadata.extend(entry.subgroup.iter().cloned());
        metadata.extend(entry.unicode_major().map(|major| format!("uc{major}")));
    }
    metadata
        .into_iter()
        .map(SimilarityLabel::new)
        .chain(row.text_labels().map(|(_, l)| SimilarityLabel::from_label(l)))
        .unique_by(|l| l.identity.clone())
        .collect()
}

fn category_labels(entry: &Entry) -> Vec<Label> {
    let (major, minor) = entry
        .general_category
        .as_deref()
        .map_or((None, None), general_category_labels);
    let mut labels: Vec<Label> = Vec::new();
    let texts = [entry.group.as_deref(), entry.subgroup.as_deref(), major, minor];
    for text in texts.into_iter().flatten() {
        let label = Label::category(text);
        if !label.is_empty() && !labels.iter().any(|l| l.key == label.key) {
            labels.push(label);
        }
    }
    labels
}
