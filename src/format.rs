//! Spytext format reference
//!
//! This module documents the text format produced by [`to_string`](crate::to_string)
//! and read by [`from_str`](crate::from_str).
//!
//! # Overview
//!
//! Spytext turns one in-memory value into one line of text and back. It is meant
//! for snapshotting object state in tests: the text is compact, diffable, and
//! names the type of every object it contains.
//!
//! There is no whitespace, no quoting and no version marker. Everything is built
//! from four shapes.
//!
//! | Shape  | Encoded form                              | Produced by |
//! |--------|-------------------------------------------|-------------|
//! | Null   | `&null`, or `<null>` at the root          | `None`, `()` |
//! | Scalar | escaped text                              | numbers, `bool`, `char`, strings, unit variants |
//! | Object | `<TypeName;field=value;...>`              | structs, maps, struct variants |
//! | Array  | `<array;value;...>`                       | `Vec`, slices, sets, tuples |
//!
//! # Objects
//!
//! ```text
//! <no.steria.Person;name=Ada;born=1815;tags=<array;math;poetry>>
//! ```
//!
//! - The type name directly follows `<`. It is the serde container name, so
//!   `#[serde(rename = "no.steria.Person")]` sets a qualified one.
//! - Fields follow in declaration order as `name=value`, separated by `;`.
//! - A struct without fields, and a unit struct, is just `<Name>`.
//! - A tuple struct numbers its fields: `<Pair;0=7;1=x>`.
//! - A newtype struct is written as its inner value.
//! - Maps use the tag `map`. Keys must be scalars and additionally escape `=` as
//!   `&eq`: `<map;a&eqb=1;c=2>`.
//!
//! # Arrays
//!
//! ```text
//! <array;1;2;3>
//! <array;<Point;x=1;y=2>;&null;<array>>
//! ```
//!
//! Elements are written in order and may be any shape. The empty array is
//! `<array>`.
//!
//! # Scalars
//!
//! A scalar is the value's text with four reserved characters replaced:
//!
//! | Raw | Escaped |
//! |-----|---------|
//! | `&` | `&amp`  |
//! | `;` | `&semi` |
//! | `<` | `&lt`   |
//! | `>` | `&gt`   |
//!
//! So `a&;<>bc` is written `a&amp&semi&lt&gtbc`. Decoding replaces entities in
//! a single pass, which makes every string round-trip, including strings that
//! spell an entity themselves.
//!
//! At the root a scalar is wrapped with its type so the text stays a unit:
//! `<i32;42>`, `<String;hello>`, `<bool;true>`.
//!
//! Dates and decimals are scalars in a fixed layout; see [`date`](crate::date),
//! [`decimal`](crate::decimal) and [`bigint`](crate::bigint).
//!
//! # Enums
//!
//! | Variant | Encoded form |
//! |---------|--------------|
//! | unit    | `Variant` (`<Enum;Variant>` at the root) |
//! | newtype | `<Variant;value>` |
//! | tuple   | `<Variant;a;b>` |
//! | struct  | `<Variant;field=value;...>` |
//!
//! # Decoding
//!
//! Decoding is driven by the target type. The text is split at the top level of
//! each unit only, so nested units pass through as single tokens:
//!
//! ```text
//! <Outer;inner=<Inner;x=1;y=2>>   ->   ["Outer", "inner=<Inner;x=1;y=2>"]
//! ```
//!
//! A field segment is split once on its first `=`; the value keeps any later
//! `=` characters.
//!
//! Decoding fails when:
//!
//! - brackets are unbalanced or text follows the closing `>`
//! - an object's type name differs from the target's (unless
//!   [`Options::lenient`](crate::Options::lenient) is used)
//! - an encoded field does not exist on the target, including an empty struct
//!   or an index past the end of a tuple struct
//! - a tuple or fixed-size array gets the wrong number of elements
//! - a map target gets a unit not tagged `map` (unless lenient)
//! - a scalar cannot be read as the declared type
//! - nesting exceeds [`Options::max_depth`](crate::Options::max_depth)
//!
//! Fields missing from the text follow serde's rules: `Option` fields become
//! `None`, `#[serde(default)]` fields take their default, and anything else is
//! an error.
//!
//! # Limitations
//!
//! - **Cycles**: a value that refers to itself cannot be encoded.
//! - **Map keys**: must be scalars.
//! - **Untyped decode**: [`Value`](crate::Value) keeps type names, but decoding
//!   through `deserialize_any` (for example into `serde_json::Value`) sees
//!   objects as plain maps.
//! - **Decimals**: go through `f64` on decode and may lose precision.

// Documentation only.
