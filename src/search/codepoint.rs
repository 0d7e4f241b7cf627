//! Hexadecimal code point queries.
//!
//! A query of 1 to 6 hex digits naming a valid scalar value also yields that
//! character. When the query contains a decimal digit (`2019`, `1b`) the
//! code point is the only answer; a query made only of the letters a-f
//! (`face`, `cafe`) is an ordinary word too, so keyword matching runs and
//! the code point is appended after it.

/// A query that names a Unicode scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePointQuery {
    pub ch: char,
    /// True when no keyword matching should run.
    pub exclusive: bool,
}

pub fn parse_code_point(query: &str) -> Option<CodePointQuery> {
    let query = query.trim();
    if query.is_empty() || query.len() > 6 || !query.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(query, 16).ok()?;
    // from_u32 rejects surrogates and values above U+10FFFF.
    let ch = char::from_u32(value)?;
    Some(CodePointQuery {
        ch,
        exclusive: query.chars().any(|c| c.is_ascii_digit()),
    })
}

/// `U+2019` label, followed by the character name when one is known.
pub fn code_point_comment(ch: char, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => format!("U+{:X} {}", ch as u32, name),
        _ => format!("U+{:X}", ch as u32),
    }
}
