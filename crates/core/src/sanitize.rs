//! Input sanitization for user-submitted text.
//!
//! Submitted character sheets arrive from a public browser form, so
//! every field passes through here before validation and storage:
//! control characters are stripped, runs of horizontal whitespace are
//! collapsed, and single-line fields have newlines folded away.
//! HTML escaping is NOT done here; it happens at render time in
//! [`crate::profile`] so the database keeps the text the user typed.

/// Sanitize multi-line text (backstory, appearance).
///
/// Strips control characters except `\n`, collapses runs of spaces and
/// tabs into a single space, collapses three or more consecutive
/// newlines into two, and trims the result.
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    let mut newline_run = 0u8;

    for ch in input.chars() {
        match ch {
            '\n' => {
                pending_space = false;
                if newline_run < 2 {
                    out.push('\n');
                    newline_run += 1;
                }
            }
            c if c == ' ' || c == '\t' => {
                pending_space = true;
            }
            c if c.is_control() => {
                // \r and all other control characters are dropped.
            }
            c => {
                if pending_space && !out.is_empty() && !out.ends_with('\n') {
                    out.push(' ');
                }
                pending_space = false;
                newline_run = 0;
                out.push(c);
            }
        }
    }

    out.trim().to_string()
}

/// Sanitize a single-line field (name, class, alignment).
///
/// Like [`sanitize_text`], but newlines are folded into spaces.
pub fn sanitize_line(input: &str) -> String {
    let folded: String = input
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    sanitize_text(&folded)
}

/// Sanitize a list of single-line entries (skills, inventory).
///
/// Each entry is sanitized as a line; entries that end up empty are
/// dropped.
pub fn sanitize_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| sanitize_line(s))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize_text("Thog\u{0000} the\u{0007} Bold"), "Thog the Bold");
    }

    #[test]
    fn collapses_horizontal_whitespace() {
        assert_eq!(sanitize_text("a  \t  b"), "a b");
    }

    #[test]
    fn preserves_paragraph_breaks_but_caps_them() {
        assert_eq!(sanitize_text("one\n\ntwo"), "one\n\ntwo");
        assert_eq!(sanitize_text("one\n\n\n\n\ntwo"), "one\n\ntwo");
    }

    #[test]
    fn drops_carriage_returns() {
        assert_eq!(sanitize_text("one\r\ntwo"), "one\ntwo");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_text("  padded  "), "padded");
        assert_eq!(sanitize_text("\n\nleading newlines"), "leading newlines");
    }

    #[test]
    fn line_folds_newlines_to_spaces() {
        assert_eq!(sanitize_line("Grog\nthe Mighty"), "Grog the Mighty");
    }

    #[test]
    fn list_drops_entries_that_sanitize_to_empty() {
        let items = vec![
            "Stealth".to_string(),
            "   ".to_string(),
            "\u{0001}\u{0002}".to_string(),
            "Arcana".to_string(),
        ];
        assert_eq!(sanitize_list(&items), vec!["Stealth", "Arcana"]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize_text(""), "");
        assert_eq!(sanitize_line(""), "");
        assert!(sanitize_list(&[]).is_empty());
    }
}
