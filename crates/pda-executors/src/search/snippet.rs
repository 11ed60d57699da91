//! Match snippet extraction.

/// Code points of context kept on each side of the first match.
const CONTEXT_CODE_POINTS: usize = 100;

/// Upper bound on snippet length in code points.
const MAX_SNIPPET_CODE_POINTS: usize = 200;

/// Extracts a snippet around the first occurrence of `query` in `text`.
///
/// Up to 100 code points before and after the match, trimmed to at most
/// 200 code points total. Line breaks are ordinary characters and survive.
/// Returns an empty string when the query does not occur.
pub(super) fn snippet(text: &str, query: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let query_chars: Vec<char> = query.chars().collect();

    let Some(match_idx) = find_code_points(&chars, &query_chars) else {
        return String::new();
    };

    let start = match_idx.saturating_sub(CONTEXT_CODE_POINTS);
    let end = (match_idx + query_chars.len() + CONTEXT_CODE_POINTS).min(chars.len());

    chars[start..end]
        .iter()
        .take(MAX_SNIPPET_CODE_POINTS)
        .collect()
}

/// First occurrence of `needle` in `haystack`, as a code-point index.
fn find_code_points(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_text_when_short() {
        assert_eq!(snippet("hello world", "world"), "hello world");
    }

    #[test]
    fn test_absent_query_yields_empty() {
        assert_eq!(snippet("hello", "xyz"), "");
    }

    #[test]
    fn test_context_is_bounded() {
        let text = format!("{}NEEDLE{}", "a".repeat(500), "b".repeat(500));
        let out = snippet(&text, "NEEDLE");
        assert_eq!(out.chars().count(), MAX_SNIPPET_CODE_POINTS);
        assert!(out.contains("NEEDLE"));
        // 100 before the 6-char match, the remaining cap after it.
        assert!(out.starts_with(&"a".repeat(100)));
    }

    #[test]
    fn test_line_breaks_survive() {
        let out = snippet("first line\nsecond line", "second");
        assert!(out.contains('\n'));
    }

    #[test]
    fn test_counts_code_points_not_bytes() {
        // 300 two-byte code points before the match.
        let text = format!("{}x", "é".repeat(300));
        let out = snippet(&text, "x");
        assert_eq!(out.chars().count(), 101);
    }

    #[test]
    fn test_match_at_start() {
        let text = format!("NEEDLE{}", "b".repeat(500));
        let out = snippet(&text, "NEEDLE");
        assert!(out.starts_with("NEEDLE"));
        assert_eq!(out.chars().count(), 106);
    }
}
