pub mod types;
pub mod unicode;

pub use types::{Annotation, Candidate, Entry};
pub use unicode::SkinTone;
