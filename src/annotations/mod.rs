//! Annotation data: language tiers, the in-memory index and providers.

pub mod index;
pub mod language;
pub mod source;

pub use index::{AnnotationIndex, EntryId};
pub use source::{AnnotationSource, JsonFileSource, SourceError, StaticSource};
