#![forbid(unsafe_code)]

use std::path::{is_separator, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::pak::error::{PakError, PakResult};

/// Filename pattern that matches every entry of a directory.
pub const MATCH_ALL: &str = "*";

pub fn has_wildcard(s: &str) -> bool {
    s.contains(['?', '*'])
}

pub fn ends_with_separator(s: &str) -> bool {
    s.chars().last().is_some_and(is_separator)
}

/// Split a source argument into the directory to enumerate and the filename
/// pattern to match inside it.
///
/// Directory-like sources are enumerated whole. File-like sources split at
/// their last component; an empty last component matches everything.
pub fn split_source(raw: &str, directory_like: bool) -> (PathBuf, String) {
    if directory_like {
        return (PathBuf::from(raw), MATCH_ALL.to_string());
    }
    if ends_with_separator(raw) {
        let trimmed = raw.trim_end_matches(is_separator);
        let base = if trimmed.is_empty() { &raw[..1] } else { trimmed };
        return (PathBuf::from(base), MATCH_ALL.to_string());
    }

    let p = Path::new(raw);
    let pattern = match p.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => MATCH_ALL.to_string(),
    };
    let base = match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (base, pattern)
}

/// Compile a single path segment into a glob pattern. Only `?` and `*` are
/// wildcards; brackets match literally.
pub fn compile_segment(segment: &str) -> PakResult<Pattern> {
    let mut escaped = String::with_capacity(segment.len());
    for ch in segment.chars() {
        match ch {
            '[' => escaped.push_str("[[]"),
            ']' => escaped.push_str("[]]"),
            _ => escaped.push(ch),
        }
    }
    Pattern::new(&escaped)
        .map_err(|e| PakError::InvalidArgument(format!("bad pattern {segment:?}: {e}")))
}

pub fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: !cfg!(windows),
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_detection() {
        assert!(has_wildcard("*.txt"));
        assert!(has_wildcard("file?.log"));
        assert!(!has_wildcard("report.txt"));
        assert!(!has_wildcard("out[1]"));
    }

    #[test]
    fn split_directory_source() {
        let (base, pat) = split_source("docs", true);
        assert_eq!(base, PathBuf::from("docs"));
        assert_eq!(pat, MATCH_ALL);
    }

    #[test]
    fn split_file_source() {
        let (base, pat) = split_source("docs/report.txt", false);
        assert_eq!(base, PathBuf::from("docs"));
        assert_eq!(pat, "report.txt");

        let (base, pat) = split_source("docs/*.txt", false);
        assert_eq!(base, PathBuf::from("docs"));
        assert_eq!(pat, "*.txt");
    }

    #[test]
    fn split_bare_name_uses_current_dir() {
        let (base, pat) = split_source("report.txt", false);
        assert_eq!(base, PathBuf::from("."));
        assert_eq!(pat, "report.txt");
    }

    #[test]
    fn split_trailing_separator_matches_everything() {
        let (base, pat) = split_source("docs/", false);
        assert_eq!(base, PathBuf::from("docs"));
        assert_eq!(pat, MATCH_ALL);
    }

    #[test]
    fn brackets_are_literal() {
        let p = compile_segment("out[1]*").unwrap();
        assert!(p.matches_with("out[1].txt", match_options()));
        assert!(!p.matches_with("out1.txt", match_options()));
    }

    #[test]
    fn question_mark_matches_one_char() {
        let p = compile_segment("a?.txt").unwrap();
        assert!(p.matches_with("ab.txt", match_options()));
        assert!(!p.matches_with("abc.txt", match_options()));
    }
}
