//! # serde_spytext
//!
//! A Serde-compatible, self-describing text encoding for snapshotting object
//! state in tests.
//!
//! ## What is spytext?
//!
//! Spytext writes any `Serialize` value as one line of angle-bracketed text
//! that names every object's type:
//!
//! ```text
//! <no.steria.Person;name=Ada;tags=<array;math;poetry>;spouse=&null>
//! ```
//!
//! The same text decodes back into an equal value, so it can be stored as a
//! fixture, compared in an assertion, or replayed into a later test run.
//!
//! ## Key Features
//!
//! - **Reversible**: every string round-trips, whatever characters it contains
//! - **Self-describing**: objects carry their type name, arrays their `array` tag
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]` as is
//! - **Name-checked**: decoding into the wrong type is an error, not a silent match
//! - **Dynamic**: [`Value`] reads any snapshot without its Rust type, and
//!   [`Registry`] decodes by encoded type name
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_spytext::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice; admin".to_string(),
//!     active: true,
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "<User;id=123;name=Alice&semi admin;active=true>");
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Nested values
//!
//! ```rust
//! use serde::Serialize;
//! use serde_spytext::to_string;
//!
//! #[derive(Serialize)]
//! struct Line { sku: String, qty: u32 }
//!
//! #[derive(Serialize)]
//! struct Order { id: u64, lines: Vec<Line>, note: Option<String> }
//!
//! let order = Order {
//!     id: 7,
//!     lines: vec![Line { sku: "A-1".into(), qty: 2 }],
//!     note: None,
//! };
//! assert_eq!(
//!     to_string(&order).unwrap(),
//!     "<Order;id=7;lines=<array;<Line;sku=A-1;qty=2>>;note=&null>"
//! );
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events: `debug` for registry activity and type
//! name mismatches, `trace` for every decoded unit. No subscriber is installed.
//!
//! ## Format Reference
//!
//! See the [`format`] module for the complete grammar.

pub mod bigint;
pub mod date;
pub mod de;
pub mod decimal;
pub mod error;
pub mod escape;
pub mod format;
pub mod map;
pub mod options;
pub mod registry;
pub mod ser;
pub mod split;
pub mod value;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use map::FieldMap;
pub use options::Options;
pub use registry::Registry;
pub use ser::Serializer;
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::io;

/// Encodes a value as spytext.
///
/// # Errors
///
/// Returns an error if the value's `Serialize` impl fails, if a map key is not
/// a scalar, or if nesting exceeds the default depth limit.
///
/// # Examples
///
/// ```rust
/// use serde_spytext::to_string;
///
/// assert_eq!(to_string(&vec![1, 2, 3]).unwrap(), "<array;1;2;3>");
/// assert_eq!(to_string(&42).unwrap(), "<i32;42>");
/// assert_eq!(to_string(&None::<i32>).unwrap(), "<null>");
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::default())
}

/// Encodes a value as spytext with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_spytext::{to_string_with_options, Error, Options};
///
/// let nested = vec![vec![vec![1]]];
/// let shallow = Options::new().with_max_depth(2);
/// assert_eq!(
///     to_string_with_options(&nested, shallow),
///     Err(Error::DepthLimitExceeded(2))
/// );
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new(options);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Converts a value into a dynamic [`Value`] tree.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_spytext::to_value;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.type_name(), Some("Point"));
/// assert_eq!(value.get("x").and_then(|v| v.as_str()), Some("1"));
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    Value::parse(&to_string(value)?)
}

/// Decodes a [`Value`] tree into a typed value.
///
/// The tree is re-encoded and decoded, so the same type name and field checks
/// apply as for [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: &Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    from_str(&value.to_string())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, Options::default())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: Options) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Decodes a value from spytext.
///
/// # Errors
///
/// See [`Error`] for the failure categories.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_spytext::{from_str, Error};
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("<Point;x=1;y=2>").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
///
/// let err = from_str::<Point>("<Vector;x=1;y=2>").unwrap_err();
/// assert!(matches!(err, Error::TypeResolution { .. }));
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_str_with_options(s, Options::default())
}

/// Decodes a value from spytext with custom options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<'a, T>(s: &'a str, options: Options) -> Result<T>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::with_options(s, options);
    T::deserialize(&mut deserializer)
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::io(&e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        assert_eq!(text, "<Point;x=1;y=2>");
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };

        let text = to_string(&user).unwrap();
        assert_eq!(text, "<User;id=123;name=Alice;active=true;tags=<array;admin;user>>");
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_to_value() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(value.type_name(), Some("Point"));
        assert_eq!(value.get("x"), Some(&Value::scalar("1")));
        assert_eq!(value.get("y"), Some(&Value::scalar("2")));
    }

    #[test]
    fn test_from_value() {
        let value = Value::parse("<Point;x=-3;y=4>").unwrap();
        let point: Point = from_value(&value).unwrap();
        assert_eq!(point, Point { x: -3, y: 4 });
    }

    #[test]
    fn test_arrays() {
        let numbers = vec![1, 2, 3, 4, 5];
        let text = to_string(&numbers).unwrap();
        let numbers_back: Vec<i32> = from_str(&text).unwrap();
        assert_eq!(numbers, numbers_back);
    }

    #[test]
    fn test_maps() {
        let mut scores = BTreeMap::new();
        scores.insert("ada".to_string(), 10);
        scores.insert("bob".to_string(), 7);
        let text = to_string(&scores).unwrap();
        assert_eq!(text, "<map;ada=10;bob=7>");
        assert_eq!(from_str::<BTreeMap<String, i32>>(&text).unwrap(), scores);
    }

    #[test]
    fn test_lenient_options() {
        let options = Options::lenient();
        let point: Point = from_str_with_options("<geo.Point;x=1;y=2>", options).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
        assert!(from_str::<Point>("<geo.Point;x=1;y=2>").is_err());
    }

    #[test]
    fn test_writer_and_reader() {
        let mut buf = Vec::new();
        to_writer(&mut buf, &Point { x: 5, y: 6 }).unwrap();
        assert_eq!(buf, b"<Point;x=5;y=6>");

        let point: Point = from_reader(buf.as_slice()).unwrap();
        assert_eq!(point, Point { x: 5, y: 6 });
        let point: Point = from_slice(&buf).unwrap();
        assert_eq!(point, Point { x: 5, y: 6 });
    }

    #[test]
    fn test_invalid_utf8_slice() {
        let err = from_slice::<Point>(&[b'<', 0xff, b'>']).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
