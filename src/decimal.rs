//! Decimal fields.
//!
//! A [`Decimal`] is written with its `Display` form. It is read back through an
//! `f64`: the encoded text is parsed as a float and the float's shortest
//! decimal rendering becomes the decimal. Values that need more than about 15
//! significant digits therefore lose precision on the way back.
//!
//! ```rust
//! use decimal_rs::Decimal;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Price {
//!     #[serde(with = "serde_spytext::decimal")]
//!     amount: Decimal,
//! }
//!
//! let price = Price { amount: "12.5".parse().unwrap() };
//! let text = serde_spytext::to_string(&price).unwrap();
//! assert_eq!(text, "<Price;amount=12.5>");
//!
//! let back: Price = serde_spytext::from_str(&text).unwrap();
//! assert_eq!(back, price);
//! ```

use decimal_rs::{Decimal, DecimalParseError};
use serde::de::{self, Deserialize, Deserializer, Unexpected};
use serde::Serializer;
use std::fmt::Write;

const EXPECTED: &str = "a number representable as a decimal";

pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let wide = f64::deserialize(deserializer)?;
    widen(wide)
}

/// Converts a float to a decimal through its shortest text form.
///
/// Floats too small for a decimal become zero.
///
/// # Errors
///
/// Non-finite floats and floats too large for a decimal are invalid values.
pub fn widen<E: de::Error>(value: f64) -> Result<Decimal, E> {
    let mut buf = String::with_capacity(32);
    write!(buf, "{}", value).map_err(E::custom)?;
    match buf.parse::<Decimal>() {
        Ok(decimal) => Ok(decimal),
        Err(DecimalParseError::Underflow) => Ok(Decimal::ZERO),
        Err(_) => Err(E::invalid_value(Unexpected::Float(value), &EXPECTED)),
    }
}

/// `Option<Decimal>`, with `None` as null.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        Option::<f64>::deserialize(deserializer)?.map(widen).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_str, to_string, Error};
    use serde::Serialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Ledger {
        #[serde(with = "crate::decimal")]
        balance: Decimal,
        #[serde(with = "crate::decimal::option")]
        limit: Option<Decimal>,
    }

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_encode_uses_display() {
        let ledger = Ledger {
            balance: dec("-1234.5678"),
            limit: None,
        };
        assert_eq!(to_string(&ledger).unwrap(), "<Ledger;balance=-1234.5678;limit=&null>");
    }

    #[test]
    fn test_short_values_survive() {
        let ledger = Ledger {
            balance: dec("0.1"),
            limit: Some(dec("250")),
        };
        let back: Ledger = from_str(&to_string(&ledger).unwrap()).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn test_long_values_widen_through_float() {
        let text = "<Ledger;balance=12345678901234567890.123456789;limit=&null>";
        let back: Ledger = from_str(text).unwrap();
        assert_ne!(back.balance, dec("12345678901234567890.123456789"));
        assert_eq!(back.balance, dec("12345678901234567000"));
    }

    #[test]
    fn test_widen_edges() {
        assert_eq!(widen::<Error>(0.0).unwrap(), Decimal::ZERO);
        assert!(matches!(widen::<Error>(f64::NAN), Err(Error::InvalidValue { .. })));
        assert!(matches!(widen::<Error>(f64::INFINITY), Err(Error::InvalidValue { .. })));
    }
}
