//! Static profile page rendering.
//!
//! Approved characters get a public HTML page generated by
//! substituting `{{placeholder}}` markers in an operator-supplied
//! template. The rendering here is pure string work; the API crate
//! owns reading the template and writing the output file.
//!
//! Substituted values are always HTML-escaped. A placeholder with no
//! matching value renders as an empty string rather than failing --
//! the template is operator-edited and a typo must not break every
//! approval.

use std::collections::HashMap;

/// Maximum length of the name-derived portion of a slug.
const SLUG_NAME_MAX_LEN: usize = 48;

/// Escape a string for safe inclusion in HTML text content.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render a list field as HTML `<li>` items, one per entry.
///
/// Entries are escaped individually. An empty list renders as an empty
/// string so the surrounding `<ul>` simply has no items.
pub fn render_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert multi-line text into HTML paragraphs.
///
/// Blank-line-separated blocks become `<p>` elements; single newlines
/// inside a block become `<br>`.
pub fn render_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            let escaped = escape_html(block.trim());
            format!("<p>{}</p>", escaped.replace('\n', "<br>"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitute `{{name}}` markers in `template` with values from `vars`.
///
/// Values in `vars` are inserted verbatim, so callers must pass
/// already-escaped HTML (via [`escape_html`], [`render_list`], or
/// [`render_paragraphs`]). Markers with no entry in `vars` are replaced
/// with the empty string. Anything that is not a well-formed
/// `{{identifier}}` marker is copied through unchanged.
pub fn render_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    if let Some(value) = vars.get(key) {
                        out.push_str(value);
                    }
                    // Unknown keys render as empty.
                } else {
                    // Not a marker (e.g. "{{ a b }}"); keep the literal text.
                    out.push_str(&rest[start..start + 2 + end + 2]);
                }
                rest = &after_open[end + 2..];
            }
            None => {
                // Unclosed "{{" -- copy the remainder through.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Derive the profile filename slug for a character.
///
/// Lowercases the name, maps non-alphanumeric runs to single dashes,
/// truncates, and prefixes the database id so slugs are unique even
/// when names collide. A name with no usable characters falls back to
/// `"character"`.
pub fn slugify(id: i64, name: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
            if slug.len() >= SLUG_NAME_MAX_LEN {
                break;
            }
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("character");
    }

    format!("{id}-{slug}")
}
