//! Date and time fields in the fixed compact layout.
//!
//! Every date is written as `yyyyMMddHHmmssSSS` (milliseconds, no separators),
//! for example `20230115143022123`. Offset-aware values append the offset as
//! `+hhmm`. The layout is not configurable.
//!
//! Use the submodules with `#[serde(with = "...")]`:
//!
//! ```rust
//! use chrono::{NaiveDate, NaiveDateTime};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Event {
//!     #[serde(with = "serde_spytext::date::naive")]
//!     at: NaiveDateTime,
//!     #[serde(with = "serde_spytext::date::naive::option")]
//!     ended: Option<NaiveDateTime>,
//! }
//!
//! let at = NaiveDate::from_ymd_opt(2023, 1, 15)
//!     .unwrap()
//!     .and_hms_milli_opt(14, 30, 22, 123)
//!     .unwrap();
//! let event = Event { at, ended: None };
//!
//! let text = serde_spytext::to_string(&event).unwrap();
//! assert_eq!(text, "<Event;at=20230115143022123;ended=&null>");
//! assert_eq!(serde_spytext::from_str::<Event>(&text).unwrap(), event);
//! ```

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserialize, Deserializer, Unexpected};
use serde::Serializer;

/// Layout of dates without an offset.
pub const DATE_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Layout of dates with a fixed offset.
pub const DATE_FORMAT_WITH_OFFSET: &str = "%Y%m%d%H%M%S%3f%z";

const EXPECTED: &str = "a date in yyyyMMddHHmmssSSS form";
const EXPECTED_WITH_OFFSET: &str = "a date in yyyyMMddHHmmssSSS+hhmm form";

fn invalid<E: de::Error>(text: &str, expected: &'static str) -> E {
    E::invalid_value(Unexpected::Str(text), &expected)
}

/// `NaiveDateTime` in the plain layout.
pub mod naive {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text)
    }

    pub(super) fn parse<E: de::Error>(text: &str) -> Result<NaiveDateTime, E> {
        NaiveDateTime::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid(text, EXPECTED))
    }

    /// `Option<NaiveDateTime>`, with `None` as null.
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| parse(&text))
                .transpose()
        }
    }
}

/// `DateTime<Utc>`, written as its UTC wall time in the plain layout.
pub mod utc {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        super::naive::serialize(&value.naive_utc(), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        super::naive::deserialize(deserializer).map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let naive = crate::date::naive::option::deserialize(deserializer)?;
            Ok(naive.map(|naive| Utc.from_utc_datetime(&naive)))
        }
    }
}

/// `DateTime<FixedOffset>`, with the offset appended as `+hhmm`.
pub mod offset {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATE_FORMAT_WITH_OFFSET))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text)
    }

    pub(super) fn parse<E: de::Error>(text: &str) -> Result<DateTime<FixedOffset>, E> {
        DateTime::parse_from_str(text, DATE_FORMAT_WITH_OFFSET)
            .map_err(|_| invalid(text, EXPECTED_WITH_OFFSET))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<FixedOffset>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| parse(&text))
                .transpose()
        }
    }
}
