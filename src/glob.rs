//! Translation of wildcard path segments (`*`, `?`) into equivalent
//! regular expressions.
//!
//! The `*` wildcard is deliberately non-greedy across segment boundaries:
//! it matches any run of characters *excluding* the literal character that
//! follows it in the segment, so `2023-*-report` matches `2023-04-report`
//! without letting the run swallow further `-report`-like suffixes. Only a
//! trailing `*` matches unrestricted. `?` matches exactly one character.
//! `.` is the only character escaped when building the expression.

use crate::error::Error;
use lazy_static::lazy_static;
use regex::Regex;

/// Compiled form of a single path segment.
#[derive(Debug, Clone)]
pub enum Compiled {
    /// A segment with no wildcard characters, kept verbatim and matched by
    /// string equality.
    Literal(String),
    /// A segment containing `*` or `?`, matched against the anchored regex.
    Wildcard(Regex),
}

impl Compiled {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Compiled::Wildcard(_))
    }

    /// Returns true if `name` matches this segment in full.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Compiled::Literal(text) => text == name,
            Compiled::Wildcard(regex) => regex.is_match(name),
        }
    }
}

/// Returns true if the segment contains wildcard characters.
pub fn has_wildcard(segment: &str) -> bool {
    lazy_static! {
        static ref WILDCARD_MATCHER: Regex = Regex::new(r"[*?]").unwrap();
    }

    WILDCARD_MATCHER.is_match(segment)
}

/// Compiles one path segment. Literal segments are returned unchanged;
/// segments with wildcards become anchored regular expressions.
pub fn compile(segment: &str) -> Result<Compiled, Error> {
    if !has_wildcard(segment) {
        return Ok(Compiled::Literal(segment.to_owned()));
    }

    let pattern = format!("^{}$", wildcard_pattern(segment));
    match Regex::new(&pattern) {
        Ok(regex) => Ok(Compiled::Wildcard(regex)),
        Err(_) => Err(Error::UnsupportedPattern(segment.to_owned())),
    }
}

/// Builds the unanchored expression body for a segment known to contain
/// wildcards.
fn wildcard_pattern(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut pattern = String::new();

    for pos in 0..chars.len() {
        match chars[pos] {
            '*' => match chars.get(pos + 1).copied() {
                // A run stops at the first occurrence of the literal
                // character following the `*`.
                Some('.') => pattern.push_str(r"([^\.]*)"),
                Some(stop) => {
                    pattern.push_str("([^");
                    pattern.push(stop);
                    pattern.push_str("]*)");
                }
                None => pattern.push_str("(.*)"),
            },
            '?' => pattern.push('.'),
            '.' => pattern.push_str(r"\."),
            c => pattern.push(c),
        }
    }

    pattern
}
