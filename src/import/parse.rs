//! Term list parsing.

/// Split raw import text into terms.
///
/// Terms are separated by carriage returns, newlines or commas. Each
/// segment is trimmed and empty segments are dropped; order is preserved.
pub fn parse_terms(text: &str) -> Vec<String> {
    text.split(['\r', '\n', ','])
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_separators() {
        assert_eq!(parse_terms("cat,dog\n\nfish"), vec!["cat", "dog", "fish"]);
    }

    #[test]
    fn test_crlf_and_whitespace() {
        assert_eq!(
            parse_terms("  serendipity \r\n ephemeral,\t labyrinth  \r\n"),
            vec!["serendipity", "ephemeral", "labyrinth"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_terms("").is_empty());
        assert!(parse_terms(" ,\n\r, ,").is_empty());
    }

    #[test]
    fn test_inner_spaces_kept() {
        assert_eq!(parse_terms("ad hoc, per se"), vec!["ad hoc", "per se"]);
    }
}
