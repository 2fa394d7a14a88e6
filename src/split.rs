//! Depth-aware tokenizer for encoded units.
//!
//! An encoded unit has the form `<A;B;C>` where any part may itself contain
//! balanced `<...>` units. [`split`] returns the parts at the unit's own depth
//! only:
//!
//! ```rust
//! use serde_spytext::split::split;
//!
//! let tokens = split("<Outer;inner=<Inner;x=1;y=2>>").unwrap();
//! assert_eq!(tokens, vec!["Outer", "inner=<Inner;x=1;y=2>"]);
//! ```

use crate::{Error, Result};

/// Splits one encoded unit into its top-level tokens.
///
/// Token 0 is the unit's tag (a type name or `array`); the remaining tokens are
/// field segments or elements. `<Name>` yields just `["Name"]`.
///
/// # Errors
///
/// Returns [`Error::Malformed`] when the text does not start with `<`, when a
/// `<` is never closed, or when anything follows the unit's closing `>`.
pub fn split(text: &str) -> Result<Vec<&str>> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'<') {
        return Err(Error::malformed(0, "expected '<' to open a unit"));
    }

    let mut level = 0usize;
    let mut start = 0;
    let mut tokens = Vec::new();

    // Delimiters are ASCII, so every byte position matched below is a char boundary.
    for (pos, &byte) in bytes.iter().enumerate() {
        match byte {
            b'<' => {
                level += 1;
                if level == 1 {
                    start = pos + 1;
                }
            }
            b'>' => {
                level -= 1;
                if level == 0 {
                    tokens.push(&text[start..pos]);
                    if pos + 1 != bytes.len() {
                        return Err(Error::malformed(
                            pos + 1,
                            "unexpected text after the closing '>'",
                        ));
                    }
                    return Ok(tokens);
                }
            }
            b';' if level == 1 => {
                tokens.push(&text[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }

    Err(Error::malformed(bytes.len(), "unclosed '<'"))
}

/// Splits a field segment once on its first `=`.
///
/// Returns `None` for the value when the segment has no `=` at all, which is
/// how a root scalar payload or an enum payload looks. A segment that is itself
/// a unit is never a pair, whatever it contains.
#[must_use]
pub fn split_pair(segment: &str) -> (&str, Option<&str>) {
    if is_unit(segment) {
        return (segment, None);
    }
    match segment.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (segment, None),
    }
}

/// Returns `true` if the text is a bracketed unit rather than a scalar.
#[inline]
#[must_use]
pub fn is_unit(text: &str) -> bool {
    text.starts_with('<')
}
