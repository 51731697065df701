//! Splits a path pattern into folder snippets, the units of work consumed
//! by the traversal engine.
//!
//! Consecutive literal segments are merged into one snippet so the whole
//! run can be resolved in a single remote lookup; a wildcard segment is
//! never merged with a neighbor. The final segment of the path always
//! forms its own terminal snippet, because it is the only one matched
//! against files as well as folders.

use crate::error::Error;
use crate::glob::{self, Compiled};
use crate::path;
use regex::Regex;

/// The unit of remote lookup or child matching during traversal.
#[derive(Debug, Clone)]
pub enum FolderSnippet {
    /// One or more consecutive literal segments, resolved as a single
    /// direct path lookup.
    Literal(Vec<String>),
    /// Exactly one wildcard segment with its compiled expression.
    Wildcard { segment: String, regex: Regex },
}

impl FolderSnippet {
    pub fn uses_regex(&self) -> bool {
        matches!(self, FolderSnippet::Wildcard { .. })
    }

    /// The segments rejoined with `/`. For a literal snippet this is the
    /// relative path handed to the remote store in one lookup.
    pub fn folder_part(&self) -> String {
        match self {
            FolderSnippet::Literal(segments) => segments.join("/"),
            FolderSnippet::Wildcard { segment, .. } => segment.clone(),
        }
    }

    /// Returns true if a folder or file name matches this snippet. Only
    /// meaningful for single-segment snippets, which is the only kind the
    /// traversal matches names against.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            FolderSnippet::Literal(segments) => {
                segments.len() == 1 && segments[0] == name
            }
            FolderSnippet::Wildcard { regex, .. } => regex.is_match(name),
        }
    }
}

fn snippet_of(segment: &str, compiled: Compiled) -> FolderSnippet {
    match compiled {
        Compiled::Literal(text) => FolderSnippet::Literal(vec![text]),
        Compiled::Wildcard(regex) => FolderSnippet::Wildcard {
            segment: segment.to_owned(),
            regex,
        },
    }
}

/// Splits `pattern` into an ordered snippet sequence. Never returns an
/// empty sequence; a pattern with no segments at all is rejected.
pub fn split_into_snippets(pattern: &str) -> Result<Vec<FolderSnippet>, Error> {
    let unquoted = path::unquote(pattern);
    let segments = path::segments(unquoted);
    if segments.is_empty() {
        return Err(Error::UnsupportedPattern(pattern.to_owned()));
    }

    let mut snippets = vec![];
    let mut running = snippet_of(segments[0], glob::compile(segments[0])?);

    let last = segments.len() - 1;
    for &segment in segments.iter().take(last).skip(1) {
        let compiled = glob::compile(segment)?;
        if running.uses_regex() || compiled.is_wildcard() {
            snippets.push(running);
            running = snippet_of(segment, compiled);
        } else {
            match &mut running {
                FolderSnippet::Literal(parts) => match compiled {
                    Compiled::Literal(text) => parts.push(text),
                    Compiled::Wildcard(_) => unreachable!(),
                },
                FolderSnippet::Wildcard { .. } => unreachable!(),
            }
        }
    }
    snippets.push(running);

    // The terminal segment is matched against both files and folders, so
    // it is never merged into the preceding literal run.
    if segments.len() > 1 {
        let compiled = glob::compile(segments[last])?;
        snippets.push(snippet_of(segments[last], compiled));
    }

    Ok(snippets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(snippets: &[FolderSnippet]) -> Vec<String> {
        snippets.iter().map(|s| s.folder_part()).collect()
    }

    #[test]
    fn test_consecutive_literals_are_merged() {
        let snippets = split_into_snippets("A/B/C*/D").unwrap();

        assert_eq!(parts(&snippets), vec!["A/B", "C*", "D"]);
        assert!(!snippets[0].uses_regex());
        assert!(snippets[1].uses_regex());
        assert!(!snippets[2].uses_regex());
    }

    #[test]
    fn test_single_segment_path_yields_one_terminal_snippet() {
        let snippets = split_into_snippets("X*").unwrap();

        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].uses_regex());
        assert_eq!(snippets[0].folder_part(), "X*");
    }

    #[test]
    fn test_terminal_literal_is_never_merged() {
        let snippets = split_into_snippets("a/b/c").unwrap();

        assert_eq!(parts(&snippets), vec!["a/b", "c"]);
    }

    #[test]
    fn test_literal_run_after_wildcard() {
        let snippets = split_into_snippets("a*/b/c/d").unwrap();

        assert_eq!(parts(&snippets), vec!["a*", "b/c", "d"]);
    }

    #[test]
    fn test_terminal_wildcard_after_literal_run() {
        let snippets = split_into_snippets("a/b/c*").unwrap();

        assert_eq!(parts(&snippets), vec!["a/b", "c*"]);
        assert!(snippets[1].uses_regex());
    }

    #[test]
    fn test_surrounding_quotes_are_stripped() {
        let snippets = split_into_snippets("\"A/B\"").unwrap();

        assert_eq!(parts(&snippets), vec!["A", "B"]);
    }

    #[test]
    fn test_leading_and_trailing_separators_are_ignored() {
        let snippets = split_into_snippets("/A/B/").unwrap();

        assert_eq!(parts(&snippets), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_pattern_is_rejected() {
        assert!(matches!(
            split_into_snippets(""),
            Err(Error::UnsupportedPattern(_))
        ));
        assert!(matches!(
            split_into_snippets("/"),
            Err(Error::UnsupportedPattern(_))
        ));
    }

    #[test]
    fn test_snippet_name_matching() {
        let snippets = split_into_snippets("A/B*/C").unwrap();

        assert!(snippets[1].matches("B1"));
        assert!(!snippets[1].matches("X"));
        assert!(snippets[2].matches("C"));
        assert!(!snippets[2].matches("c"));
    }
}
