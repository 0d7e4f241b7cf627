//! Query normalization, scoring strategies and result assembly.

pub mod cache;
pub mod classic;
pub mod codepoint;
pub mod engine;
pub mod fuzzy;
pub mod normalize;
pub mod ranker;
pub mod ratio;
pub mod similar;
pub mod skin_tone;
pub mod spellcheck;
pub mod transliterate;
