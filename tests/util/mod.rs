use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use emoji_matcher::config::{MatchAlgorithm, MatcherConfig};
use emoji_matcher::matcher::{Capabilities, EmojiMatcher};
use emoji_matcher::model::{Candidate, Entry};
use emoji_matcher::search::spellcheck::SpellChecker;
use emoji_matcher::search::transliterate::{TransliterationRegistry, Transliterator};
use tempfile::TempDir;

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TempFixtureDir {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TempFixtureDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write `content` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write fixture file");
        path
    }
}

/// Path of a checked-in fixture under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Table-driven transliterator standing in for romaji and pinyin providers.
#[derive(Debug, Clone, Default)]
pub struct MapTransliterator {
    table: HashMap<String, Vec<String>>,
}

#[allow(dead_code)]
impl MapTransliterator {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        let mut table: HashMap<String, Vec<String>> = HashMap::new();
        for (word, spelling) in pairs {
            table
                .entry((*word).to_string())
                .or_default()
                .push((*spelling).to_string());
        }
        Self { table }
    }
}

impl Transliterator for MapTransliterator {
    fn transliterate(&self, text: &str) -> Vec<String> {
        self.table.get(text).cloned().unwrap_or_default()
    }
}

/// Spell checker with fixed corrections.
#[derive(Debug, Clone, Default)]
pub struct MapSpellChecker {
    table: HashMap<String, Vec<String>>,
}

#[allow(dead_code)]
impl MapSpellChecker {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        let mut table: HashMap<String, Vec<String>> = HashMap::new();
        for (word, correction) in pairs {
            table
                .entry((*word).to_string())
                .or_default()
                .push((*correction).to_string());
        }
        Self { table }
    }
}

impl SpellChecker for MapSpellChecker {
    fn suggest(&self, word: &str) -> Vec<String> {
        self.table.get(word).cloned().unwrap_or_default()
    }
}

/// Romaji for the Japanese fixture words.
#[allow(dead_code)]
pub fn romaji() -> MapTransliterator {
    MapTransliterator::new(&[
        ("かたつむり", "katatsumuri"),
        ("カタツムリ", "katatsumuri"),
        ("でんでんむし", "dendenmushi"),
        ("ネコ", "neko"),
    ])
}

/// Pinyin for the Chinese fixture words.
#[allow(dead_code)]
pub fn pinyin() -> MapTransliterator {
    MapTransliterator::new(&[("赛马", "sàimǎ"), ("骑马", "qímǎ")])
}

/// Registry with the romaji and pinyin tables in place of kana folding.
#[allow(dead_code)]
pub fn full_transliteration() -> TransliterationRegistry {
    TransliterationRegistry::new()
        .with("ja", Arc::new(romaji()))
        .with("zh", Arc::new(pinyin()))
}

fn tone(phrase: &str, en: &str, type_label: &str, de: &str) -> Entry {
    Entry::new(phrase)
        .with_group("component", "skin-tone")
        .with_category("Sk")
        .with_version("8.0")
        .annotate("en", en, &[en, "skin tone", type_label])
        .annotate("de", de, &[de, "Hautfarbe"])
}

/// A small multilingual annotation set covering every query path.
#[allow(dead_code)]
pub fn fixture_entries() -> Vec<Entry> {
    vec![
        Entry::new("🦧")
            .with_group("nature", "animal-mammal")
            .with_category("So")
            .with_version("12.0")
            .annotate("en", "orangutan", &["ape"])
            .annotate("de", "Orang-Utan", &["Affe"]),
        Entry::new("🐫")
            .with_group("nature", "animal-mammal")
            .with_category("So")
            .with_version("6.0")
            .annotate("en", "two-hump camel", &["bactrian", "camel", "hump", "two-hump"])
            .annotate("es", "camello", &["bactriano", "camello", "desierto", "joroba"]),
        Entry::new("🐪")
            .with_group("nature", "animal-mammal")
            .with_category("So")
            .with_version("6.0")
            .annotate("en", "camel", &["dromedary", "hump", "one-hump"])
            .annotate("es", "dromedario", &["camello", "desierto", "joroba"]),
        Entry::new("🐌")
            .with_group("nature", "animal-bug")
            .with_category("So")
            .with_version("6.0")
            .annotate("en", "snail", &["slow"])
            .annotate("ja", "かたつむり", &["カタツムリ", "でんでんむし"]),
        Entry::new("🐞")
            .with_group("nature", "animal-bug")
            .with_category("So")
            .with_version("6.0")
            .annotate("en", "lady beetle", &["beetle", "insect", "ladybird", "ladybug"]),
        Entry::new("🐈")
            .with_group("nature", "animal-mammal")
            .with_category("So")
            .with_version("6.0")
            .annotate("en", "cat", &["pet"])
            .annotate("ja", "ネコ", &["ネコ", "猫"]),
        Entry::new("🇺🇸")
            .with_group("flags", "country-flag")
            .with_version("6.0")
            .annotate("en", "flag: United States", &["flag"])
            .annotate("de", "Flagge: Vereinigte Staaten", &["Flagge"]),
        Entry::new("🇺🇲")
            .with_group("flags", "country-flag")
            .with_version("6.0")
            .annotate("en", "flag: U.S. Outlying Islands", &["flag"]),
        Entry::new("🇺🇳")
            .with_group("flags", "country-flag")
            .with_version("6.0")
            .annotate("en", "flag: United Nations", &["flag"]),
        Entry::new("🇦🇪")
            .with_group("flags", "country-flag")
            .with_version("6.0")
            .annotate("en", "flag: United Arab Emirates", &["flag"]),
        Entry::new("👨")
            .with_group("people", "person")
            .with_category("So")
            .with_version("6.0")
            .with_skin_tones()
            .annotate("en", "man", &["adult", "man"])
            .annotate("de", "Mann", &["Erwachsener", "Mann"]),
        Entry::new("👋")
            .with_group("people", "hand-fingers-open")
            .with_category("So")
            .with_version("6.0")
            .with_skin_tones()
            .annotate("en", "waving hand", &["hand", "wave", "waving"]),
        Entry::new("🧑")
            .with_group("people", "person")
            .with_category("So")
            .with_version("10.0")
            .with_skin_tones()
            .annotate("en", "person", &["adult", "gender-neutral", "person"]),
        Entry::new("🤝")
            .with_group("people", "hands")
            .with_category("So")
            .with_version("9.0")
            .with_skin_tones()
            .annotate("en", "handshake", &["agreement", "hand", "meeting", "shake"]),
        Entry::new("🧑\u{200D}🤝\u{200D}🧑")
            .with_group("people", "family")
            .with_version("12.0")
            .with_skin_tones()
            .annotate("en", "people holding hands", &["couple", "hand", "hold", "person"]),
        tone("🏻", "light skin tone", "type 1–2", "helle Hautfarbe"),
        tone("🏼", "medium-light skin tone", "type 3", "mittelhelle Hautfarbe"),
        tone("🏽", "medium skin tone", "type 4", "mittlere Hautfarbe"),
        tone("🏾", "medium-dark skin tone", "type 5", "mitteldunkle Hautfarbe"),
        tone("🏿", "dark skin tone", "type 6", "dunkle Hautfarbe"),
        Entry::new("🤐")
            .with_group("smileys", "face-sleepy")
            .with_category("So")
            .with_version("8.0")
            .annotate("en", "zipper-mouth face", &["face", "mouth", "zipper"])
            .annotate("de", "Gesicht mit Reißverschlussmund", &["Gesicht", "Mund", "Reißverschluss"])
            .annotate("de_CH", "Gesicht mit Reissverschlussmund", &["Gesicht", "Mund", "Reissverschluss"]),
        Entry::new("😎")
            .with_group("smileys", "face-glasses")
            .with_category("So")
            .with_version("6.0")
            .annotate(
                "en",
                "smiling face with sunglasses",
                &["bright", "cool", "face", "sun", "sunglasses"],
            ),
        Entry::new("\u{263A}\u{FE0F}")
            .with_group("smileys", "face-affection")
            .with_category("So")
            .with_version("1.1")
            .annotate("en", "smiling face", &["face", "outlined", "relaxed", "smile"]),
        Entry::new("💩")
            .with_group("smileys", "face-costume")
            .with_category("So")
            .with_version("6.0")
            .annotate("en", "pile of poo", &["dung", "face", "monster", "poo", "poop"])
            .annotate("it", "cacca", &["cacca", "escremento", "faccina"]),
        Entry::new("🏇")
            .with_group("activities", "sport")
            .with_category("So")
            .with_version("6.0")
            .annotate("en", "horse racing", &["horse", "jockey", "racehorse", "racing"])
            .annotate("zh", "赛马", &["赛马", "骑马"]),
        Entry::new("⚛\u{FE0F}")
            .with_group("symbols", "religion")
            .with_category("So")
            .with_version("4.1")
            .annotate("en", "atom symbol", &["atheist", "atom"]),
        Entry::new("$")
            .with_category("Sc")
            .with_version("1.1")
            .annotate("en", "dollar sign", &["currency", "dollar", "money"]),
        Entry::new("\u{2019}")
            .with_category("Pf")
            .with_version("1.1")
            .annotate("en", "right single quotation mark", &[])
            .annotate("fr", "apostrophe droite", &[]),
        Entry::new("A")
            .with_category("Lu")
            .with_version("1.1")
            .annotate("en", "latin capital letter a", &[]),
    ]
}

#[allow(dead_code)]
pub fn matcher(languages: &[&str]) -> EmojiMatcher {
    matcher_with(languages, MatchAlgorithm::Classic, Capabilities::default())
}

#[allow(dead_code)]
pub fn matcher_with(
    languages: &[&str],
    algorithm: MatchAlgorithm,
    capabilities: Capabilities,
) -> EmojiMatcher {
    let config = MatcherConfig::default()
        .with_languages(languages.iter().copied())
        .with_algorithm(algorithm);
    EmojiMatcher::with_capabilities(fixture_entries(), config, capabilities)
}

#[allow(dead_code)]
pub fn phrases(candidates: &[Candidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.phrase.as_str()).collect()
}

/// Fluent assertions on a single candidate.
#[allow(dead_code)]
pub fn assert_candidate(candidate: &Candidate) -> CandidateAssert<'_> {
    CandidateAssert { candidate }
}

#[allow(dead_code)]
pub struct CandidateAssert<'a> {
    candidate: &'a Candidate,
}

#[allow(dead_code)]
impl CandidateAssert<'_> {
    pub fn phrase(self, expected: impl AsRef<str>) -> Self {
        assert_eq!(
            self.candidate.phrase,
            expected.as_ref(),
            "phrase mismatch for {:?}",
            self.candidate
        );
        self
    }

    pub fn comment(self, expected: impl AsRef<str>) -> Self {
        assert_eq!(
            self.candidate.comment,
            expected.as_ref(),
            "comment mismatch for {:?}",
            self.candidate
        );
        self
    }

    pub fn comment_contains(self, needle: impl AsRef<str>) -> Self {
        assert!(
            self.candidate.comment.contains(needle.as_ref()),
            "expected comment to contain {:?}, got {:?}",
            needle.as_ref(),
            self.candidate.comment
        );
        self
    }

    pub fn comment_starts_with(self, prefix: impl AsRef<str>) -> Self {
        assert!(
            self.candidate.comment.starts_with(prefix.as_ref()),
            "expected comment to start with {:?}, got {:?}",
            prefix.as_ref(),
            self.candidate.comment
        );
        self
    }
}
