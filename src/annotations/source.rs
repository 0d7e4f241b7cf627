//! Annotation providers.
//!
//! The matcher core trusts its entries; providers load them and enforce the
//! data invariants: every phrase non-empty and unique, every entry with at
//! least one non-blank annotation.
//!
//! The JSON layout accepted by [`JsonFileSource`]:
//!
//! ```json
//! {
//!   "version": "15.1",
//!   "entries": [
//!     {
//!       "phrase": "🐪",
//!       "group": "animals-nature",
//!       "subgroup": "animal-mammal",
//!       "general_category": "So",
//!       "unicode_version": "6.0",
//!       "annotations": {
//!         "en": { "name": "camel", "keywords": ["dromedary", "hump"] },
//!         "es": { "name": "dromedario", "keywords": ["joroba"] }
//!       }
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Entry;

/// Errors that can occur when loading annotation data.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read annotation file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse annotation JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Entry #{index} has an empty phrase")]
    EmptyPhrase { index: usize },

    #[error("Entry {phrase:?} has no non-empty annotation")]
    Unannotated { phrase: String },

    #[error("Entry {phrase:?} appears more than once")]
    DuplicatePhrase { phrase: String },
}

/// Anything that can produce the entry set.
pub trait AnnotationSource {
    fn load(&self) -> Result<Vec<Entry>, SourceError>;
}

/// On-disk annotation bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationFile {
    #[serde(default)]
    pub version: Option<String>,
    pub entries: Vec<Entry>,
}

/// Loads entries from a JSON annotation bundle.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnnotationSource for JsonFileSource {
    fn load(&self) -> Result<Vec<Entry>, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::ReadFile {
            path: self.path.clone(),
            source,
        })?;
        let entries = parse_annotation_json(&content)?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "annotations_loaded");
        Ok(entries)
    }
}

/// Entries held in memory, validated like any other source.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<Entry>,
}

impl StaticSource {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl AnnotationSource for StaticSource {
    fn load(&self) -> Result<Vec<Entry>, SourceError> {
        validate_entries(&self.entries)?;
        Ok(self.entries.clone())
    }
}

pub fn parse_annotation_json(content: &str) -> Result<Vec<Entry>, SourceError> {
    let file: AnnotationFile = serde_json::from_str(content)?;
    validate_entries(&file.entries)?;
    Ok(file.entries)
}

pub fn validate_entries(entries: &[Entry]) -> Result<(), SourceError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if entry.phrase.is_empty() {
            return Err(SourceError::EmptyPhrase { index });
        }
        if entry.annotations.values().all(|a| a.is_blank()) {
            return Err(SourceError::Unannotated {
                phrase: entry.phrase.clone(),
            });
        }
        if !seen.insert(entry.phrase.as_str()) {
            return Err(SourceError::DuplicatePhrase {
                phrase: entry.phrase.clone(),
            });
        }
    }
    Ok(())
}
