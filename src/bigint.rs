//! Arbitrary-precision integer fields.
//!
//! `num_bigint`'s own serde impl writes a sign and a list of digits. With this
//! module a [`BigInt`] is a plain decimal scalar instead, like every other
//! integer.
//!
//! ```rust
//! use num_bigint::BigInt;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Account {
//!     #[serde(with = "serde_spytext::bigint")]
//!     balance: BigInt,
//! }
//!
//! let account = Account { balance: "-170141183460469231731687303715884105729".parse().unwrap() };
//! let text = serde_spytext::to_string(&account).unwrap();
//! assert_eq!(text, "<Account;balance=-170141183460469231731687303715884105729>");
//! assert_eq!(serde_spytext::from_str::<Account>(&text).unwrap(), account);
//! ```

use num_bigint::BigInt;
use serde::de::{self, Deserialize, Deserializer, Unexpected};
use serde::Serializer;

pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text)
}

fn parse<E: de::Error>(text: &str) -> Result<BigInt, E> {
    text.parse()
        .map_err(|_| E::invalid_value(Unexpected::Str(text), &"a decimal integer"))
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<BigInt>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigInt>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse(&text))
            .transpose()
    }
}
