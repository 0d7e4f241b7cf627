pub mod annotations;
pub mod config;
pub mod matcher;
pub mod model;
pub mod search;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use annotations::{AnnotationSource, JsonFileSource};
use config::{MatchAlgorithm, MatcherConfig};
use matcher::{Capabilities, EmojiMatcher, QueryOptions};
use model::Candidate;
use search::spellcheck::WordListSpellChecker;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "emoji-match",
    version,
    about = "Look up emoji and Unicode characters by keyword, code point or similarity"
)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Annotation JSON file (defaults to annotations.json in the platform data dir)
    #[arg(long, global = true, env = "EMOJI_MATCH_DATA")]
    pub data: Option<PathBuf>,

    /// Language tag, highest priority first; repeatable
    #[arg(long = "lang", global = true)]
    pub languages: Vec<String>,

    /// Matching algorithm: classic or fuzzy
    #[arg(long, global = true)]
    pub algorithm: Option<MatchAlgorithm>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Candidates for a typed query
    Candidates {
        /// Query words; joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of candidates
        #[arg(long)]
        limit: Option<usize>,

        /// Expand query words with spelling suggestions from the annotation vocabulary
        #[arg(long, default_value_t = false)]
        spellcheck: bool,

        /// Added to every score
        #[arg(long, default_value_t = 0.0)]
        hint: f64,

        /// Output JSON instead of tab-separated lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Entries sharing the most keywords with a phrase
    Similar {
        phrase: String,

        /// Maximum number of rows
        #[arg(long)]
        limit: Option<usize>,

        /// Show only names, without the shared keyword list
        #[arg(long, default_value_t = false)]
        no_keywords: bool,

        /// Output JSON instead of tab-separated lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let data_path = cli.data.clone().unwrap_or_else(default_data_path);

    let spellcheck_wanted = config.spellcheck
        || matches!(cli.command, Commands::Candidates { spellcheck: true, .. });
    let entries = JsonFileSource::new(&data_path)
        .load()
        .with_context(|| format!("loading annotations from {}", data_path.display()))?;
    let mut capabilities = Capabilities::default();
    if spellcheck_wanted {
        let vocabulary = entries
            .iter()
            .flat_map(|e| e.annotations.values())
            .flat_map(|a| std::iter::once(&a.name).chain(a.keywords.iter()))
            .flat_map(|text| search::normalize::tokenize(text));
        capabilities =
            capabilities.with_spellchecker(Arc::new(WordListSpellChecker::new(vocabulary)));
    }
    let matcher = EmojiMatcher::with_capabilities(entries, config, capabilities);

    match cli.command {
        Commands::Candidates {
            query,
            limit,
            spellcheck,
            hint,
            json,
        } => {
            let options = QueryOptions {
                match_limit: limit,
                spellcheck: spellcheck.then_some(true),
                frequency_hint: hint,
            };
            let candidates = matcher.candidates_with(&query.join(" "), &options);
            print_candidates(&candidates, json)
        }
        Commands::Similar {
            phrase,
            limit,
            no_keywords,
            json,
        } => {
            let candidates = matcher.similar(&phrase, limit, Some(!no_keywords));
            print_candidates(&candidates, json)
        }
    }
}

/// File config, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<MatcherConfig> {
    let mut config = match &cli.config {
        Some(path) => MatcherConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MatcherConfig::load_default().context("loading default config")?,
    };
    if !cli.languages.is_empty() {
        config.languages = cli.languages.clone();
    }
    if let Some(algorithm) = cli.algorithm {
        config.match_algorithm = algorithm;
    }
    config.validate().context("validating config")?;
    Ok(config)
}

fn print_candidates(candidates: &[Candidate], json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, candidates).context("writing JSON")?;
        writeln!(out)?;
    } else {
        for c in candidates {
            writeln!(out, "{}\t{:.2}\t{}", c.phrase, c.score, c.comment)?;
        }
    }
    Ok(())
}

pub fn default_data_path() -> PathBuf {
    directories::ProjectDirs::from("com", "emoji-matcher", "emoji-matcher").map_or_else(
        || PathBuf::from("annotations.json"),
        |dirs| dirs.data_dir().join("annotations.json"),
    )
}
