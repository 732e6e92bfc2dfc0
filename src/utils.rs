//! Utility functions for text cleanup, logging, and URL-list input.
//!
//! This module provides helper functions used throughout the application:
//! - Duplicate-word removal for scraped titles and descriptions
//! - String truncation for logging
//! - Reading newline-separated URL lists from disk

use std::collections::HashSet;
use tokio::fs;
use tracing::debug;

/// Remove duplicate words from text while preserving order.
///
/// The platform serves campaign titles and descriptions with every word
/// rendered twice (once for the visible element, once for an accessibility
/// node), so "Help Help Rebuild Rebuild" is really "Help Rebuild".
/// Comparison is case-insensitive; the first spelling wins.
///
/// # Arguments
///
/// * `text` - The text to clean
///
/// # Returns
///
/// The text with later repetitions of any word removed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(remove_duplicate_words("Help Help Rebuild Rebuild"), "Help Rebuild");
/// ```
pub fn remove_duplicate_words(text: &str) -> String {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for word in text.split_whitespace() {
        if seen.insert(word.to_lowercase()) {
            result.push(word);
        }
    }
    result.join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// The original string if shorter than `max`, otherwise a truncated version
/// with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}

/// Read a newline-separated URL list from a file.
///
/// Blank lines and lines starting with `#` are skipped; surrounding
/// whitespace is trimmed.
///
/// # Arguments
///
/// * `path` - The file to read
///
/// # Returns
///
/// The URLs in file order, or the underlying I/O error.
pub async fn read_url_lines(path: &str) -> std::io::Result<Vec<String>> {
    let contents = fs::read_to_string(path).await?;
    let urls: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    debug!(count = urls.len(), path, "Read URL list");
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_duplicate_words() {
        assert_eq!(
            remove_duplicate_words("Help Help Rebuild Rebuild the the Library Library"),
            "Help Rebuild the Library"
        );
        assert_eq!(remove_duplicate_words("no repeats here"), "no repeats here");
        assert_eq!(remove_duplicate_words(""), "");
    }

    #[test]
    fn test_remove_duplicate_words_is_case_insensitive() {
        assert_eq!(remove_duplicate_words("Fund fund FUND drive"), "Fund drive");
    }

    #[test]
    fn test_remove_duplicate_words_collapses_whitespace() {
        assert_eq!(remove_duplicate_words("a   b\n\tc"), "a b c");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[tokio::test]
    async fn test_read_url_lines() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "https://example.com/f/one\n\n# comment\n  https://example.com/f/two  "
        )
        .unwrap();

        let urls = read_url_lines(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/f/one".to_string(),
                "https://example.com/f/two".to_string(),
            ]
        );
    }
}
