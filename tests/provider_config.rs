mod util;

use emoji_matcher::annotations::{AnnotationSource, JsonFileSource, SourceError, StaticSource};
use emoji_matcher::config::{ConfigError, MatchAlgorithm, MatcherConfig};
use emoji_matcher::matcher::{Capabilities, EmojiMatcher};
use emoji_matcher::model::Entry;
use util::{TempFixtureDir, TestTracing, assert_candidate, fixture_path};

fn fixture_matcher(languages: &[&str]) -> EmojiMatcher {
    let source = JsonFileSource::new(fixture_path("annotations.json"));
    let config = MatcherConfig::default().with_languages(languages.iter().copied());
    EmojiMatcher::from_source(&source, config, Capabilities::default()).expect("fixture loads")
}

#[test]
fn bundled_fixture_loads() {
    let entries = JsonFileSource::new(fixture_path("annotations.json"))
        .load()
        .expect("fixture loads");
    assert_eq!(entries.len(), 6);
    assert!(entries.iter().any(|e| e.phrase == "🇨🇭"));
}

#[test]
fn fixture_answers_queries() {
    let m = fixture_matcher(&["de"]);
    let c = m.candidates("ch", None, None);
    assert_candidate(&c[0])
        .phrase("🇨🇭")
        .comment("Flagge: Schweiz “ch”");

    let c = m.candidates("Wahrung", None, None);
    assert_candidate(&c[0]).phrase("€").comment("Euro-Zeichen [Währung]");

    let c = m.candidates("wave tone3", None, None);
    assert_candidate(&c[0])
        .phrase("👋🏽")
        .comment("waving hand: medium skin tone “wave tone3”");
}

#[test]
fn loading_is_logged() {
    let tracing = TestTracing::new();
    let _guard = tracing.install();
    let _ = fixture_matcher(&[]);
    tracing.assert_contains("annotations_loaded");
    tracing.assert_contains("index_built");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempFixtureDir::new();
    let path = dir.path().join("absent.json");
    let err = JsonFileSource::new(&path).load().unwrap_err();
    match err {
        SourceError::ReadFile { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = TempFixtureDir::new();
    let path = dir.write("bad.json", "{ \"entries\": [ { \"phrase\": ");
    let err = JsonFileSource::new(path).load().unwrap_err();
    assert!(matches!(err, SourceError::ParseJson(_)), "{err}");
}

#[test]
fn data_invariants_are_enforced() {
    let dir = TempFixtureDir::new();

    let path = dir.write(
        "empty.json",
        r#"{ "entries": [ { "phrase": "", "annotations": { "en": { "name": "nothing" } } } ] }"#,
    );
    let err = JsonFileSource::new(path).load().unwrap_err();
    assert!(matches!(err, SourceError::EmptyPhrase { index: 0 }), "{err}");

    let path = dir.write(
        "bare.json",
        r#"{ "entries": [ { "phrase": "🐪", "annotations": { "en": { "name": " " } } } ] }"#,
    );
    let err = JsonFileSource::new(path).load().unwrap_err();
    assert!(
        matches!(&err, SourceError::Unannotated { phrase } if phrase == "🐪"),
        "{err}"
    );

    let path = dir.write(
        "twice.json",
        r#"{ "entries": [
            { "phrase": "🐪", "annotations": { "en": { "name": "camel" } } },
            { "phrase": "🐪", "annotations": { "en": { "name": "camel again" } } }
        ] }"#,
    );
    let err = JsonFileSource::new(path).load().unwrap_err();
    assert!(matches!(err, SourceError::DuplicatePhrase { .. }), "{err}");
}

#[test]
fn static_source_errors_propagate() {
    let source = StaticSource::new(vec![Entry::new("🐪")]);
    let err = EmojiMatcher::from_source(&source, MatcherConfig::default(), Capabilities::none())
        .unwrap_err();
    assert!(matches!(err, SourceError::Unannotated { .. }));

    let source = StaticSource::new(vec![Entry::new("🐪").annotate("en", "camel", &[])]);
    let m = EmojiMatcher::from_source(&source, MatcherConfig::default(), Capabilities::none())
        .expect("valid entries");
    assert_eq!(m.candidates("camel", None, None)[0].phrase, "🐪");
}

#[test]
fn config_file_round_trip() {
    let dir = TempFixtureDir::new();
    let path = dir.write(
        "config.toml",
        r#"
languages = ["de_CH", "ja_JP"]
match_algorithm = "rapidfuzz"
match_limit = 5
"#,
    );
    let config = MatcherConfig::load(&path).expect("config loads");
    assert_eq!(config.languages, vec!["de_CH", "ja_JP"]);
    assert_eq!(config.match_algorithm, MatchAlgorithm::Fuzzy);
    assert_eq!(config.match_limit, 5);
    assert!(!config.spellcheck);
    assert_eq!(config.cache_capacity, 256);

    let m = EmojiMatcher::new(util::fixture_entries(), config.with_algorithm(MatchAlgorithm::Classic));
    assert_eq!(
        m.languages(),
        ["de_CH", "de", "ja_JP", "ja", "en"].map(String::from)
    );
    assert!(m.candidates("flag", None, None).len() <= 5);
}

#[test]
fn config_errors() {
    let dir = TempFixtureDir::new();

    let err = MatcherConfig::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }), "{err}");

    let path = dir.write("unknown.toml", "colour = \"blue\"\n");
    let err = MatcherConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml(_)), "{err}");

    let path = dir.write("zero.toml", "match_limit = 0\n");
    let err = MatcherConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "{err}");

    let path = dir.write("algo.toml", "match_algorithm = \"neural\"\n");
    assert!(MatcherConfig::load(&path).is_err());
}

#[test]
fn json_tone_entries_compose_two_person_sequences() {
    let dir = TempFixtureDir::new();
    let path = dir.write(
        "people.json",
        r#"{ "entries": [
            { "phrase": "🧑", "skin_tones": true,
              "annotations": { "en": { "name": "person", "keywords": ["adult"] } } },
            { "phrase": "🤝", "skin_tones": true,
              "annotations": { "en": { "name": "handshake", "keywords": ["hand"] } } },
            { "phrase": "🧑‍🤝‍🧑", "skin_tones": true,
              "annotations": { "en": { "name": "people holding hands", "keywords": ["couple", "hand"] } } },
            { "phrase": "🏻", "group": "component", "subgroup": "skin-tone",
              "annotations": { "en": { "name": "light skin tone" } } },
            { "phrase": "🏿", "group": "component", "subgroup": "skin-tone",
              "annotations": { "en": { "name": "dark skin tone" } } }
        ] }"#,
    );
    let source = JsonFileSource::new(path);
    let m = EmojiMatcher::from_source(&source, MatcherConfig::default(), Capabilities::default())
        .expect("entries load");

    let c = m.candidates("people holding hands tone1 tone5", None, None);
    assert_candidate(&c[0])
        .phrase("🧑🏻\u{200D}🤝\u{200D}🧑🏿")
        .comment_starts_with("people holding hands: light skin tone, dark skin tone");
    assert!(!m.similar("🧑🏻\u{200D}🤝\u{200D}🧑🏿", Some(1), Some(false)).is_empty());
}
