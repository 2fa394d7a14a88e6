//! Dynamic value representation for spytext.
//!
//! [`Value`] parses any well-formed text without knowing the Rust type that
//! produced it. It is meant for inspecting and diffing snapshots: every scalar
//! stays an (unescaped) string, objects keep their type name and field order,
//! and [`Display`](std::fmt::Display) re-encodes the tree exactly.
//!
//! ## Examples
//!
//! ```rust
//! use serde_spytext::Value;
//!
//! let text = "<Order;id=7;lines=<array;<Line;sku=A&semi1;qty=2>>;note=&null>";
//! let order: Value = text.parse().unwrap();
//!
//! assert_eq!(order.type_name(), Some("Order"));
//! assert_eq!(order.get("id").and_then(Value::as_str), Some("7"));
//! assert!(order.get("note").unwrap().is_null());
//!
//! let line = &order.get("lines").and_then(Value::as_array).unwrap()[0];
//! assert_eq!(line.get("sku").and_then(Value::as_str), Some("A;1"));
//!
//! assert_eq!(order.to_string(), text);
//! ```
//!
//! ### Converting from Rust types
//!
//! ```rust
//! use serde_spytext::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 10, y: 20 }).unwrap();
//! assert_eq!(value.type_name(), Some("Point"));
//! assert_eq!(value.get("y"), Some(&Value::scalar("20")));
//! ```

use crate::de::is_scalar_tag;
use crate::escape::{escape_key, push_escaped, unescape};
use crate::ser::{ARRAY_TAG, NULL, ROOT_NULL};
use crate::split::{is_unit, split, split_pair};
use crate::{Error, FieldMap, Options, Result};
use std::fmt;
use std::str::FromStr;

/// Any encoded value, without type information.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// `&null`, or `<null>` at the root
    #[default]
    Null,
    /// Leaf text, unescaped
    Scalar(String),
    /// `<array;...>`
    Array(Vec<Value>),
    /// `<TypeName;field=value;...>`, including the empty `<TypeName>`
    Object { type_name: String, fields: FieldMap },
    /// `<Name;value;...>`: a newtype or tuple enum variant, or a unit variant
    /// written at the root as `<Enum;Variant>`
    Variant { name: String, values: Vec<Value> },
}

impl Value {
    /// Creates a scalar from any text.
    #[must_use]
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    /// Creates an object with the given type name and fields.
    #[must_use]
    pub fn object(type_name: impl Into<String>, fields: FieldMap) -> Self {
        Value::Object {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Parses encoded text with default [`Options`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] for unbalanced brackets, a repeated field
    /// name, or a unit that mixes field segments with bare values, and
    /// [`Error::DepthLimitExceeded`] past the default nesting limit.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_options(text, Options::default())
    }

    /// Parses encoded text, honouring `options.max_depth`.
    pub fn parse_with_options(text: &str, options: Options) -> Result<Self> {
        parse_value(text, 0, &options)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the unescaped text of a scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&FieldMap> {
        match self {
            Value::Object { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Returns the encoded type name of an object, or the name of a variant.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::Object { type_name, .. } => Some(type_name),
            Value::Variant { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Looks up a field of an object.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(field))
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str(NULL),
            Value::Scalar(text) => push_escaped(out, text),
            Value::Array(values) => write_unit(out, ARRAY_TAG, values),
            Value::Variant { name, values } => write_unit(out, name, values),
            Value::Object { type_name, fields } => {
                out.push('<');
                out.push_str(type_name);
                for (name, value) in fields {
                    out.push(';');
                    out.push_str(&escape_key(name));
                    out.push('=');
                    value.write_to(out);
                }
                out.push('>');
            }
        }
    }
}

fn write_unit(out: &mut String, tag: &str, values: &[Value]) {
    out.push('<');
    out.push_str(tag);
    for value in values {
        out.push(';');
        value.write_to(out);
    }
    out.push('>');
}

fn parse_value(text: &str, depth: usize, options: &Options) -> Result<Value> {
    if text == NULL || text == ROOT_NULL {
        return Ok(Value::Null);
    }
    if !is_unit(text) {
        return Ok(Value::Scalar(unescape(text).into_owned()));
    }
    if depth >= options.max_depth {
        return Err(Error::DepthLimitExceeded(options.max_depth));
    }

    let tokens = split(text)?;
    let (tag, segments) = (tokens[0], &tokens[1..]);

    if tag == ARRAY_TAG {
        let values = segments
            .iter()
            .map(|segment| parse_value(segment, depth + 1, options))
            .collect::<Result<_>>()?;
        return Ok(Value::Array(values));
    }

    // A root scalar keeps any '=' in its payload unescaped.
    if let [payload] = segments {
        if is_scalar_tag(tag) && !is_unit(payload) {
            return Ok(Value::Scalar(unescape(payload).into_owned()));
        }
    }

    let pairs: Vec<_> = segments.iter().map(|segment| split_pair(segment)).collect();
    if pairs.iter().all(|(_, value)| value.is_some()) {
        let mut fields = FieldMap::with_capacity(pairs.len());
        for (segment, (name, value)) in segments.iter().zip(pairs) {
            let name = unescape(name).into_owned();
            if fields.contains_key(&name) {
                return Err(Error::malformed(
                    segment.as_ptr() as usize - text.as_ptr() as usize,
                    "duplicate field name",
                ));
            }
            let value = value.unwrap_or_default();
            fields.insert(name, parse_value(value, depth + 1, options)?);
        }
        return Ok(Value::object(tag, fields));
    }

    if pairs.iter().any(|(_, value)| value.is_some()) {
        // point at the first bare value
        let bare = pairs.iter().position(|(_, value)| value.is_none()).unwrap_or(0);
        return Err(Error::malformed(
            segments[bare].as_ptr() as usize - text.as_ptr() as usize,
            "bare value among field segments",
        ));
    }
    let values = segments
        .iter()
        .map(|segment| parse_value(segment, depth + 1, options))
        .collect::<Result<_>>()?;
    Ok(Value::Variant {
        name: tag.to_string(),
        values,
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Value::parse(s)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Scalar(text)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars_and_null() {
        assert_eq!(Value::parse("abc").unwrap(), Value::scalar("abc"));
        assert_eq!(Value::parse("a&amp&semib").unwrap(), Value::scalar("a&;b"));
        assert_eq!(Value::parse("&null").unwrap(), Value::Null);
        assert_eq!(Value::parse("<null>").unwrap(), Value::Null);
        assert_eq!(Value::parse("").unwrap(), Value::scalar(""));
    }

    #[test]
    fn test_parse_root_scalar() {
        assert_eq!(Value::parse("<i32;42>").unwrap(), Value::scalar("42"));
        assert_eq!(Value::parse("<String;a=b>").unwrap(), Value::scalar("a=b"));
        assert_eq!(Value::parse("<String;>").unwrap(), Value::scalar(""));
    }

    #[test]
    fn test_parse_object() {
        let value = Value::parse("<Point;x=1;y=<array;2;3>>").unwrap();
        assert_eq!(value.type_name(), Some("Point"));
        assert_eq!(value.get("x"), Some(&Value::scalar("1")));
        assert_eq!(
            value.get("y"),
            Some(&Value::Array(vec![Value::scalar("2"), Value::scalar("3")]))
        );
        assert_eq!(value.get("z"), None);
    }

    #[test]
    fn test_parse_empty_object() {
        let value = Value::parse("<Empty>").unwrap();
        assert_eq!(value.type_name(), Some("Empty"));
        assert!(value.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_parse_variant() {
        let value = Value::parse("<Move;1;<Point;x=0>>").unwrap();
        match value {
            Value::Variant { name, values } => {
                assert_eq!(name, "Move");
                assert_eq!(values.len(), 2);
                assert_eq!(values[1].type_name(), Some("Point"));
            }
            other => panic!("expected a variant, got {:?}", other),
        }
    }

    #[test]
    fn test_map_keys_unescaped() {
        let value = Value::parse("<map;a&eqb=1>").unwrap();
        assert_eq!(value.get("a=b"), Some(&Value::scalar("1")));
        assert_eq!(value.to_string(), "<map;a&eqb=1>");
    }

    #[test]
    fn test_mixed_segments_rejected() {
        let err = Value::parse("<Odd;x=1;bare>").unwrap_err();
        assert!(matches!(err, Error::Malformed { offset: 9, .. }));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = Value::parse("<P;x=1;x=2>").unwrap_err();
        assert!(matches!(err, Error::Malformed { offset: 7, .. }));

        let err = Value::parse("<map;a&eqb=1;a&eqb=2>").unwrap_err();
        assert!(matches!(err, Error::Malformed { offset: 13, .. }));
    }

    #[test]
    fn test_display_round_trip() {
        for text in [
            "<Outer;inner=<Inner;x=1;y=&null>;tags=<array;a;b&semic>>",
            "<array>",
            "<array;&null;<array>>",
            "<Shape;Dot>",
        ] {
            assert_eq!(Value::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_depth_limit() {
        let options = Options::new().with_max_depth(2);
        assert!(Value::parse_with_options("<array;<array>>", options).is_ok());
        assert_eq!(
            Value::parse_with_options("<array;<array;<array>>>", options),
            Err(Error::DepthLimitExceeded(2))
        );
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(
            Value::from(vec!["a", "b"]).to_string(),
            "<array;a;b>"
        );
    }
}
