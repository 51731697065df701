//! Utilities for `/`-separated remote paths.

/// Strips surrounding quote characters from a path.
pub fn unquote(path: &str) -> &str {
    path.trim_matches(|c| c == '"' || c == '\'')
}

/// Splits a path into its non-empty segments. Leading and trailing
/// separators denote absence of a segment.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Joins two remote path fragments with a single separator. An empty
/// fragment on either side leaves the other unchanged.
pub fn join(base: &str, tail: &str) -> String {
    if base.is_empty() {
        return tail.trim_matches('/').to_owned();
    }
    if tail.is_empty() {
        return base.trim_end_matches('/').to_owned();
    }

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        tail.trim_matches('/')
    )
}

/// Inlines `.` and `..` components and collapses repeated separators.
/// Used to derive the canonical form of a remote path.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');

    let mut components: Vec<&str> = vec![];
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }

    let joined = components.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a/b\""), "a/b");
        assert_eq!(unquote("'a/b'"), "a/b");
        assert_eq!(unquote("a/b"), "a/b");
    }

    #[test]
    fn test_segments_drops_empty_parts() {
        assert_eq!(segments("/a/b/"), vec!["a", "b"]);
        assert_eq!(segments("a"), vec!["a"]);
        assert!(segments("").is_empty());
        assert!(segments("/").is_empty());
    }

    #[test]
    fn test_join() {
        assert_eq!(join("a", "b"), "a/b");
        assert_eq!(join("a/", "/b"), "a/b");
        assert_eq!(join("", "b"), "b");
        assert_eq!(join("a", ""), "a");
        assert_eq!(join("", ""), "");
    }

    #[test]
    fn test_normalize_inlines_cur_dir() {
        assert_eq!(normalize("a/./b"), "a/b");
    }

    #[test]
    fn test_normalize_inlines_parent_dir() {
        assert_eq!(normalize("a/../b"), "b");
    }

    #[test]
    fn test_normalize_collapses_separators() {
        assert_eq!(normalize("a//b"), "a/b");
        assert_eq!(normalize("/a//b"), "/a/b");
    }

    #[test]
    fn test_normalize_parent_dirs_digging_below_root() {
        assert_eq!(normalize("/.."), "/");
        assert_eq!(normalize("/../a"), "/a");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
    }
}
