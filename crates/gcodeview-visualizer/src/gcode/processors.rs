//! Line preprocessing
//!
//! Comments in G-code can be:
//! - Parentheses: (this is a comment)
//! - Semicolon: G01 X10 ; move to X10
//!
//! Preprocessing never fails. Unbalanced parentheses are stripped best-effort.

use regex::Regex;
use std::sync::OnceLock;

fn paren_comment_regex() -> &'static Regex {
    static PAREN_COMMENT: OnceLock<Regex> = OnceLock::new();
    PAREN_COMMENT.get_or_init(|| Regex::new(r"\([^()]*\)").expect("invalid regex pattern"))
}

/// Strip comments from one physical line and trim it.
///
/// Returns `None` when nothing interpretable remains.
pub fn clean_line(line: &str) -> Option<String> {
    // Remove semicolon comments (everything after first semicolon)
    let cmd = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
    .trim();

    if cmd.is_empty() {
        return None;
    }

    // A line that is one parenthesized block is a comment line
    if cmd.starts_with('(') && cmd.ends_with(')') && !cmd[1..cmd.len() - 1].contains(')') {
        return None;
    }

    if !cmd.contains('(') {
        return Some(cmd.to_string());
    }

    // Remove parenthesized blocks, innermost first, until none are left
    let mut owned = cmd.to_string();
    loop {
        let next = paren_comment_regex().replace_all(&owned, " ").into_owned();
        if next == owned {
            break;
        }
        owned = next;
    }

    // Unmatched parenthesis - remove from start to end of line
    if let Some(start) = owned.find('(') {
        owned.truncate(start);
    }
    let trimmed = owned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Iterate the interpretable lines of a document as `(line_number, text)`.
///
/// Line numbers are 1-based physical line numbers.
pub fn preprocess(text: &str) -> impl Iterator<Item = (usize, String)> + '_ {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| clean_line(line).map(|cleaned| (idx + 1, cleaned)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicolon_comment() {
        assert_eq!(
            clean_line("G1 X10 ; move to X10").as_deref(),
            Some("G1 X10")
        );
        assert_eq!(clean_line("; only a comment"), None);
    }

    #[test]
    fn test_full_paren_line_dropped() {
        assert_eq!(clean_line("(Tool change)"), None);
        assert_eq!(clean_line("   (indented comment)   "), None);
    }

    #[test]
    fn test_inline_paren_removed() {
        assert_eq!(
            clean_line("G1 (rapid move) X10").as_deref(),
            Some("G1   X10")
        );
        assert_eq!(
            clean_line("(a)G1 X1(b)").as_deref(),
            Some("G1 X1")
        );
    }

    #[test]
    fn test_unmatched_paren_truncates() {
        assert_eq!(
            clean_line("G1 X10 (unterminated").as_deref(),
            Some("G1 X10")
        );
        assert_eq!(clean_line("(never closed"), None);
    }

    #[test]
    fn test_stray_close_paren_is_permissive() {
        assert_eq!(clean_line("G1 X1 )").as_deref(), Some("G1 X1 )"));
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(clean_line("   \t  "), None);
        assert_eq!(clean_line(""), None);
    }

    #[test]
    fn test_preprocess_numbers_physical_lines() {
        let text = "; header\nG0 X1\n\n(comment)\nG1 Y2 ; cut\n";
        let lines: Vec<_> = preprocess(text).collect();
        assert_eq!(
            lines,
            vec![(2, "G0 X1".to_string()), (5, "G1 Y2".to_string())]
        );
    }
}
