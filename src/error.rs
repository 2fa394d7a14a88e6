//! Error types for spytext encoding and decoding.
//!
//! Every failure is reported once per call; nothing is retried and no partial
//! value is returned.
//!
//! ## Error Categories
//!
//! - **Type resolution**: an encoded type name is unknown or does not match the target
//! - **Field lookup**: an encoded field does not exist on the target type
//! - **Field access**: a `Serialize`/`Deserialize` impl reported its own failure
//! - **Structure**: a bracketed value has the wrong shape, or brackets are unbalanced
//! - **Scalar coercion**: leaf text cannot be read as the declared type
//!
//! ## Examples
//!
//! ```rust
//! use serde_spytext::{from_str, Error};
//!
//! let result: Result<Vec<i32>, Error> = from_str("<array;1;2");
//! assert!(matches!(result, Err(Error::Malformed { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding spytext.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The encoded type name is unknown or cannot be decoded into the target type
    #[error("cannot resolve type `{name}`{detail}")]
    TypeResolution { name: String, detail: String },

    /// An encoded field has no counterpart on the target type
    #[error("type `{type_name}` has no field `{field}`")]
    FieldNotFound { type_name: String, field: String },

    /// A field's own serialization or deserialization impl failed
    #[error("field access failed: {0}")]
    FieldAccess(String),

    /// A bracketed value has an unexpected leading tag or shape
    #[error("unsupported structure: expected {expected}, found `{found}`")]
    UnsupportedStructure { expected: String, found: String },

    /// Unbalanced brackets or an otherwise unparseable encoded unit
    #[error("malformed input at byte {offset}: {msg}")]
    Malformed { offset: usize, msg: String },

    /// Scalar text that cannot be coerced into the declared type
    #[error("invalid value: expected {expected}, found `{found}`")]
    InvalidValue { expected: String, found: String },

    /// Nesting deeper than the configured limit
    #[error("nesting depth exceeds the limit of {0}")]
    DepthLimitExceeded(usize),
}

impl Error {
    /// Creates a type resolution error for an unknown type name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_spytext::Error;
    ///
    /// let err = Error::type_resolution("com.example.Missing");
    /// assert!(err.to_string().contains("com.example.Missing"));
    /// ```
    pub fn type_resolution(name: &str) -> Self {
        Error::TypeResolution {
            name: name.to_string(),
            detail: String::new(),
        }
    }

    /// Creates a type resolution error for a name that differs from the expected one.
    pub fn type_mismatch(found: &str, expected: &str) -> Self {
        Error::TypeResolution {
            name: found.to_string(),
            detail: format!(" as `{}`", expected),
        }
    }

    /// Creates a field lookup error.
    pub fn field_not_found(type_name: &str, field: &str) -> Self {
        Error::FieldNotFound {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }
    }

    /// Creates an unsupported structure error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_spytext::Error;
    ///
    /// let err = Error::unsupported_structure("array", "Point");
    /// assert!(err.to_string().contains("expected array"));
    /// ```
    pub fn unsupported_structure(expected: &str, found: &str) -> Self {
        Error::UnsupportedStructure {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a malformed input error at the given byte offset.
    pub fn malformed(offset: usize, msg: &str) -> Self {
        Error::Malformed {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates a scalar coercion error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_spytext::Error;
    ///
    /// let err = Error::invalid_value("i32", "abc");
    /// assert_eq!(err.to_string(), "invalid value: expected i32, found `abc`");
    /// ```
    pub fn invalid_value(expected: &str, found: &str) -> Self {
        Error::InvalidValue {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::FieldAccess(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::FieldAccess(msg.to_string())
    }

    fn invalid_value(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::InvalidValue {
            expected: exp.to_string(),
            found: unexp.to_string(),
        }
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::InvalidValue {
            expected: exp.to_string(),
            found: unexp.to_string(),
        }
    }

    fn unknown_field(field: &str, _expected: &'static [&'static str]) -> Self {
        Error::FieldNotFound {
            type_name: String::new(),
            field: field.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
