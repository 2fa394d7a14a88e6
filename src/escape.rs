//! Escaping of scalar text.
//!
//! The four structural characters are replaced by named entities so a scalar
//! can never open, close or split a unit:
//!
//! | Raw | Escaped |
//! |-----|---------|
//! | `&` | `&amp`  |
//! | `;` | `&semi` |
//! | `<` | `&lt`   |
//! | `>` | `&gt`   |
//!
//! Map keys additionally escape `=` as `&eq`, since a field segment is split on
//! its first `=`.
//!
//! ```rust
//! use serde_spytext::escape::{escape, unescape};
//!
//! let escaped = escape("a&;<>bc");
//! assert_eq!(escaped, "a&amp&semi&lt&gtbc");
//! assert_eq!(unescape(&escaped), "a&;<>bc");
//! ```

use std::borrow::Cow;

const ENTITIES: [(&str, char); 5] = [
    ("&amp", '&'),
    ("&semi", ';'),
    ("&lt", '<'),
    ("&gt", '>'),
    ("&eq", '='),
];

/// Escapes the reserved characters of a scalar.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    push_escaped(&mut out, raw);
    out
}

/// Escapes a map key, which additionally must not contain `=`.
#[must_use]
pub fn escape_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '=' => out.push_str("&eq"),
            _ => push_escaped_char(&mut out, ch),
        }
    }
    out
}

/// Appends `raw` to `out` with reserved characters escaped.
pub fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        push_escaped_char(out, ch);
    }
}

#[inline]
fn push_escaped_char(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp"),
        ';' => out.push_str("&semi"),
        '<' => out.push_str("&lt"),
        '>' => out.push_str("&gt"),
        _ => out.push(ch),
    }
}

/// Reverses [`escape`] and [`escape_key`].
///
/// Entities are decoded in a single left-to-right pass, so text that was
/// produced by `escape` always comes back unchanged, even when the raw string
/// itself spelled an entity (`"&semi"` escapes to `"&ampsemi"`). An `&` that
/// starts no known entity is kept as is.
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_reserved() {
        assert_eq!(escape("a&;<>bc"), "a&amp&semi&lt&gtbc");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_ampersand_escaped_first() {
        // a literal "&lt" must not decode to "<"
        assert_eq!(escape("&lt"), "&amplt");
        assert_eq!(unescape("&amplt"), "&lt");
    }

    #[test]
    fn test_unescape_is_single_pass() {
        for raw in ["&semi", "&amp", "&ampsemi", "&&;;", "&gt&lt", "&eq", "=&=", "&"] {
            assert_eq!(unescape(&escape(raw)), raw, "raw: {:?}", raw);
            assert_eq!(unescape(&escape_key(raw)), raw, "key: {:?}", raw);
        }
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(unescape("a&b"), "a&b");
        assert_eq!(unescape("&nbsp"), "&nbsp");
        assert_eq!(unescape("trailing&"), "trailing&");
    }

    #[test]
    fn test_escape_key() {
        assert_eq!(escape_key("a=b;c"), "a&eqb&semic");
        assert_eq!(unescape("a&eqb&semic"), "a=b;c");
    }

    #[test]
    fn test_unescape_borrows_when_clean() {
        assert!(matches!(unescape("clean"), Cow::Borrowed("clean")));
    }

    #[test]
    fn test_multibyte_text() {
        let raw = "héllo;wörld<日本>";
        assert_eq!(unescape(&escape(raw)), raw);
    }
}
