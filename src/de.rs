//! Spytext deserialization.
//!
//! This module provides the [`Deserializer`] that rebuilds Rust values from
//! spytext strings.
//!
//! ## Overview
//!
//! Decoding is type-directed: the target's `Deserialize` impl says which type
//! it expects for each field, and the leaf text is coerced accordingly.
//!
//! - **Objects**: `<TypeName;field=value;...>` is split with the depth-aware
//!   [`split`](crate::split::split); the type name is checked against the target
//!   and every field name must exist on it
//! - **Arrays**: a sequence target requires a unit tagged `array`
//! - **Null**: `&null` (or `<null>` at the root) becomes `None`
//! - **Scalars**: integers, floats, bools and chars are parsed from the text;
//!   anything else receives the unescaped string
//!
//! ## Usage
//!
//! ```rust
//! use serde_spytext::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let point: Point = from_str("<Point;x=1;y=2>").unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//!
//! let tags: Vec<String> = from_str("<array;a;b&semic>").unwrap();
//! assert_eq!(tags, vec!["a", "b;c"]);
//! ```

use crate::escape::unescape;
use crate::ser::{ARRAY_TAG, MAP_TAG, NULL, ROOT_NULL};
use crate::split::{is_unit, split, split_pair};
use crate::{Error, Options, Result};
use serde::de::value::CowStrDeserializer;
use serde::de::{self, IntoDeserializer};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::{debug, trace};

/// Type tags written in front of a scalar encoded at the root, e.g. `<i32;42>`.
const SCALAR_TAGS: &[&str] = &[
    "bool", "i8", "i16", "i32", "i64", "i128", "u8", "u16", "u32", "u64", "u128", "f32", "f64",
    "char", "String",
];

pub(crate) fn is_scalar_tag(tag: &str) -> bool {
    SCALAR_TAGS.iter().any(|known| *known == tag)
}

/// The spytext deserializer.
///
/// Each instance covers exactly one encoded value; nested values get their own
/// deserializer over the corresponding token.
pub struct Deserializer<'de> {
    input: &'de str,
    options: Options,
    depth: usize,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Self::with_options(input, Options::default())
    }

    pub fn with_options(input: &'de str, options: Options) -> Self {
        Deserializer {
            input,
            options,
            depth: 0,
        }
    }

    fn is_null(&self) -> bool {
        self.input == NULL || self.input == ROOT_NULL
    }

    /// Splits this value as a unit, enforcing the depth limit.
    fn open(&self) -> Result<Vec<&'de str>> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }
        let tokens = split(self.input)?;
        trace!(tag = tokens[0], depth = self.depth, "decoding unit");
        Ok(tokens)
    }

    /// Returns the escaped text of a scalar, unwrapping the root form `<type;text>`.
    fn scalar_text(&self, expected: &str) -> Result<&'de str> {
        if self.is_null() {
            return Err(Error::invalid_value(expected, self.input));
        }
        if !is_unit(self.input) {
            return Ok(self.input);
        }
        let tokens = self.open()?;
        match tokens.as_slice() {
            [tag, payload] if is_scalar_tag(tag) && !is_unit(payload) => Ok(*payload),
            _ => Err(Error::unsupported_structure(expected, tokens[0])),
        }
    }

    fn parse_scalar<T: FromStr>(&self, expected: &str) -> Result<T> {
        let text = self.scalar_text(expected)?;
        text.parse::<T>()
            .map_err(|_| Error::invalid_value(expected, text))
    }

    /// Opens a unit that must carry the given tag.
    fn open_tagged(&self, tag: &str) -> Result<Vec<&'de str>> {
        if self.is_null() {
            return Err(Error::invalid_value(tag, self.input));
        }
        if !is_unit(self.input) {
            return Err(Error::unsupported_structure(tag, self.input));
        }
        let tokens = self.open()?;
        if tokens[0] != tag {
            return Err(Error::unsupported_structure(tag, tokens[0]));
        }
        Ok(tokens)
    }

    /// Opens an object unit, checking its type name against the target's.
    fn open_object(&self, name: &str) -> Result<Vec<&'de str>> {
        if self.is_null() {
            return Err(Error::invalid_value(name, self.input));
        }
        if !is_unit(self.input) {
            return Err(Error::unsupported_structure(name, self.input));
        }
        let tokens = self.open()?;
        if self.options.check_type_names && tokens[0] != name {
            debug!(found = tokens[0], expected = name, "type name mismatch");
            return Err(Error::type_mismatch(tokens[0], name));
        }
        Ok(tokens)
    }

    fn elements(&self, tokens: Vec<&'de str>) -> Elements<'de> {
        Elements {
            iter: tokens.into_iter(),
            options: self.options,
            depth: self.depth + 1,
        }
    }

    fn fields(&self, pairs: Vec<(&'de str, &'de str)>) -> Fields<'de> {
        Fields {
            iter: pairs.into_iter(),
            value: None,
            options: self.options,
            depth: self.depth + 1,
        }
    }
}

/// Splits `name=value` segments, rejecting segments without `=`.
fn field_pairs<'de>(unit: &'de str, segments: &[&'de str]) -> Result<Vec<(&'de str, &'de str)>> {
    segments
        .iter()
        .map(|&segment| match split_pair(segment) {
            (name, Some(value)) => Ok((name, value)),
            (_, None) => Err(Error::malformed(
                segment.as_ptr() as usize - unit.as_ptr() as usize,
                "field segment without '='",
            )),
        })
        .collect()
}

/// Checks every encoded field name against the declared fields of the target.
fn check_fields(type_name: &str, pairs: &[(&str, &str)], declared: &[&str]) -> Result<()> {
    match pairs
        .iter()
        .find(|(name, _)| !declared.iter().any(|field| field == name))
    {
        Some((name, _)) => {
            debug!(type_name, field = *name, "unknown field");
            Err(Error::field_not_found(type_name, name))
        }
        None => Ok(()),
    }
}

fn visit_text<'de, V>(text: &'de str, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    match unescape(text) {
        Cow::Borrowed(s) => visitor.visit_borrowed_str(s),
        Cow::Owned(s) => visitor.visit_string(s),
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.parse_scalar::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.is_null() {
            return visitor.visit_unit();
        }
        if !is_unit(self.input) {
            return visit_text(self.input, visitor);
        }

        let tokens = self.open()?;
        if tokens[0] == ARRAY_TAG {
            return visitor.visit_seq(self.elements(tokens[1..].to_vec()));
        }
        match tokens.as_slice() {
            [tag, payload] if is_scalar_tag(tag) && !is_unit(payload) => {
                visit_text(*payload, visitor)
            }
            // enum payloads carry bare values only
            [_, segments @ ..]
                if !segments.is_empty() && segments.iter().all(|s| split_pair(s).1.is_none()) =>
            {
                visitor.visit_seq(self.elements(segments.to_vec()))
            }
            _ => {
                let pairs = field_pairs(self.input, &tokens[1..])?;
                visitor.visit_map(self.fields(pairs))
            }
        }
    }

    deserialize_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_bool => visit_bool: bool,
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.scalar_text("char")?;
        match unescape(text).chars().next() {
            Some(ch) => visitor.visit_char(ch),
            None => Err(Error::invalid_value("char", text)),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.scalar_text("string")?;
        visit_text(text, visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.is_null() {
            visitor.visit_unit()
        } else {
            Err(Error::invalid_value("null", self.input))
        }
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let tokens = self.open_object(name)?;
        match tokens.get(1).map(|segment| split_pair(segment)) {
            None => visitor.visit_unit(),
            Some((field, Some(_))) => {
                debug!(type_name = name, field, "unknown field");
                Err(Error::field_not_found(name, field))
            }
            Some((segment, None)) => Err(Error::unsupported_structure(
                &format!("empty unit `<{}>`", name),
                segment,
            )),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let tokens = self.open_tagged(ARRAY_TAG)?;
        visitor.visit_seq(self.elements(tokens[1..].to_vec()))
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let tokens = self.open_tagged(ARRAY_TAG)?;
        let count = tokens.len() - 1;
        if count != len {
            return Err(Error::unsupported_structure(
                &format!("array of {} elements", len),
                &format!("{} elements", count),
            ));
        }
        visitor.visit_seq(self.elements(tokens[1..].to_vec()))
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let tokens = self.open_object(name)?;
        let pairs = field_pairs(self.input, &tokens[1..])?;
        let mut values = Vec::with_capacity(pairs.len());
        for (index, (field, value)) in pairs.into_iter().enumerate() {
            if index >= len || field != index.to_string() {
                debug!(type_name = name, field, "unknown field");
                return Err(Error::field_not_found(name, field));
            }
            values.push(value);
        }
        visitor.visit_seq(self.elements(values))
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.is_null() {
            return Err(Error::invalid_value(MAP_TAG, self.input));
        }
        if !is_unit(self.input) {
            return Err(Error::unsupported_structure(MAP_TAG, self.input));
        }
        let tokens = self.open()?;
        // lenient decoding takes the fields of any object as map entries
        if tokens[0] == ARRAY_TAG || (self.options.check_type_names && tokens[0] != MAP_TAG) {
            return Err(Error::unsupported_structure(MAP_TAG, tokens[0]));
        }
        let pairs = field_pairs(self.input, &tokens[1..])?;
        visitor.visit_map(self.fields(pairs))
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let tokens = self.open_object(name)?;
        let pairs = field_pairs(self.input, &tokens[1..])?;
        check_fields(tokens[0], &pairs, fields)?;
        visitor.visit_map(self.fields(pairs))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.is_null() {
            return Err(Error::invalid_value(name, self.input));
        }
        if !is_unit(self.input) {
            return visitor.visit_enum(Enum::unit(unescape(self.input)));
        }

        let tokens = self.open()?;
        match tokens.as_slice() {
            // a unit variant written at the root: `<Enum;Variant>`
            [tag, variant]
                if *tag == name && !variants.iter().any(|v| v == tag) && !is_unit(variant) =>
            {
                visitor.visit_enum(Enum::unit(unescape(*variant)))
            }
            [variant, payload @ ..] => visitor.visit_enum(Enum {
                variant: Cow::Borrowed(*variant),
                payload: payload.to_vec(),
                unit: self.input,
                options: self.options,
                depth: self.depth + 1,
            }),
            [] => Err(Error::malformed(0, "empty unit")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Elements of an `<array;...>` unit, or the values of a tuple struct/variant.
struct Elements<'de> {
    iter: std::vec::IntoIter<&'de str>,
    options: Options,
    depth: usize,
}

impl<'de> de::SeqAccess<'de> for Elements<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(token) => {
                let mut de = Deserializer {
                    input: token,
                    options: self.options,
                    depth: self.depth,
                };
                seed.deserialize(&mut de).map(Some)
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// `name=value` segments of an object or map unit.
struct Fields<'de> {
    iter: std::vec::IntoIter<(&'de str, &'de str)>,
    value: Option<&'de str>,
    options: Options,
    depth: usize,
}

impl<'de> de::MapAccess<'de> for Fields<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                let mut de = Deserializer {
                    input: key,
                    options: self.options,
                    depth: self.depth,
                };
                seed.deserialize(&mut de).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => {
                let mut de = Deserializer {
                    input: value,
                    options: self.options,
                    depth: self.depth,
                };
                seed.deserialize(&mut de)
            }
            None => Err(Error::FieldAccess(
                "next_value_seed called before next_key_seed".to_string(),
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// An enum variant tag together with its payload tokens.
struct Enum<'de> {
    variant: Cow<'de, str>,
    payload: Vec<&'de str>,
    unit: &'de str,
    options: Options,
    depth: usize,
}

impl<'de> Enum<'de> {
    fn unit(variant: Cow<'de, str>) -> Self {
        Enum {
            variant,
            payload: Vec::new(),
            unit: "",
            options: Options::default(),
            depth: 0,
        }
    }

    fn describe(&self, shape: &str) -> Error {
        Error::unsupported_structure(shape, &self.variant)
    }
}

impl<'de> de::EnumAccess<'de> for Enum<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let tag: CowStrDeserializer<'de, Error> = self.variant.clone().into_deserializer();
        let variant = seed.deserialize(tag)?;
        Ok((variant, self))
    }
}

impl<'de> de::VariantAccess<'de> for Enum<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        if self.payload.is_empty() {
            Ok(())
        } else {
            Err(self.describe("unit variant"))
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.payload.as_slice() {
            [value] => {
                let mut de = Deserializer {
                    input: *value,
                    options: self.options,
                    depth: self.depth,
                };
                seed.deserialize(&mut de)
            }
            _ => Err(self.describe("newtype variant with one value")),
        }
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.payload.len() != len {
            return Err(self.describe(&format!("tuple variant with {} values", len)));
        }
        visitor.visit_seq(Elements {
            iter: self.payload.into_iter(),
            options: self.options,
            depth: self.depth,
        })
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let pairs = field_pairs(self.unit, &self.payload)?;
        check_fields(&self.variant, &pairs, fields)?;
        visitor.visit_map(Fields {
            iter: pairs.into_iter(),
            value: None,
            options: self.options,
            depth: self.depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{from_str, from_str_with_options, Error, Options};
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Marker;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Pair(u8, String);

    #[derive(Debug, PartialEq, Deserialize)]
    struct Empty {}

    #[derive(Debug, PartialEq, Deserialize)]
    struct Meters(f64);

    #[derive(Debug, PartialEq, Deserialize)]
    enum Shape {
        Dot,
        Circle(f64),
        Line(Point, Point),
        Rect { w: u32, h: u32 },
        Blank {},
    }

    #[test]
    fn test_root_scalars() {
        assert_eq!(from_str::<i32>("<i32;-42>").unwrap(), -42);
        assert_eq!(from_str::<u64>("<u64;18446744073709551615>").unwrap(), u64::MAX);
        assert_eq!(from_str::<bool>("<bool;true>").unwrap(), true);
        assert_eq!(from_str::<char>("<char;&semi>").unwrap(), ';');
        assert_eq!(from_str::<String>("<String;>").unwrap(), "");
        assert_eq!(from_str::<String>("<String;a=b&lt>").unwrap(), "a=b<");
        assert_eq!(from_str::<Meters>("<f64;1.5>").unwrap(), Meters(1.5));
    }

    #[test]
    fn test_bare_scalar_accepted() {
        assert_eq!(from_str::<i32>("7").unwrap(), 7);
        assert_eq!(from_str::<String>("a&amp").unwrap(), "a&");
    }

    #[test]
    fn test_borrowed_str() {
        #[derive(Deserialize)]
        struct Name<'a> {
            #[serde(borrow)]
            first: &'a str,
        }

        let name: Name = from_str("<Name;first=Ada>").unwrap();
        assert_eq!(name.first, "Ada");
    }

    #[test]
    fn test_null() {
        assert_eq!(from_str::<Option<Point>>("<null>").unwrap(), None);
        assert_eq!(
            from_str::<Option<Point>>("<Point;x=1;y=2>").unwrap(),
            Some(Point { x: 1, y: 2 })
        );
        assert_eq!(
            from_str::<Vec<Option<i32>>>("<array;1;&null>").unwrap(),
            vec![Some(1), None]
        );
        assert!(matches!(
            from_str::<Point>("<null>"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            from_str::<Vec<i32>>("<array;1;&null>"),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unit_and_tuple_structs() {
        assert_eq!(from_str::<Marker>("<Marker>").unwrap(), Marker);
        assert!(matches!(
            from_str::<Marker>("<Marker;7>"),
            Err(Error::UnsupportedStructure { .. })
        ));
        assert_eq!(
            from_str::<Marker>("<Marker;ghost=1>"),
            Err(Error::field_not_found("Marker", "ghost"))
        );
        assert_eq!(
            from_str::<Pair>("<Pair;0=7;1=x>").unwrap(),
            Pair(7, "x".to_string())
        );
        assert_eq!(
            from_str::<Pair>("<Pair;1=7;0=x>"),
            Err(Error::field_not_found("Pair", "1"))
        );
    }

    #[test]
    fn test_extra_fields_rejected() {
        assert_eq!(from_str::<Empty>("<Empty>").unwrap(), Empty {});
        assert_eq!(
            from_str::<Empty>("<Empty;ghost=1>"),
            Err(Error::field_not_found("Empty", "ghost"))
        );
        assert_eq!(
            from_str::<Pair>("<Pair;0=7;1=x;2=ghost>"),
            Err(Error::field_not_found("Pair", "2"))
        );
        assert_eq!(from_str::<(i32, i32)>("<array;1;2>").unwrap(), (1, 2));
        assert!(matches!(
            from_str::<(i32, i32)>("<array;1;2;3>"),
            Err(Error::UnsupportedStructure { .. })
        ));
        assert!(matches!(
            from_str::<[u8; 3]>("<array;1;2>"),
            Err(Error::UnsupportedStructure { .. })
        ));
    }

    #[test]
    fn test_enums() {
        assert_eq!(from_str::<Shape>("<Shape;Dot>").unwrap(), Shape::Dot);
        assert_eq!(from_str::<Shape>("<Circle;2.5>").unwrap(), Shape::Circle(2.5));
        assert_eq!(
            from_str::<Shape>("<Line;<Point;x=0;y=0>;<Point;x=1;y=1>>").unwrap(),
            Shape::Line(Point { x: 0, y: 0 }, Point { x: 1, y: 1 })
        );
        assert_eq!(
            from_str::<Shape>("<Rect;w=3;h=4>").unwrap(),
            Shape::Rect { w: 3, h: 4 }
        );
        assert_eq!(
            from_str::<Vec<Shape>>("<array;Dot;<Circle;1>>").unwrap(),
            vec![Shape::Dot, Shape::Circle(1.0)]
        );
    }

    #[test]
    fn test_enum_errors() {
        assert!(matches!(
            from_str::<Shape>("<Rect;w=3;d=4>"),
            Err(Error::FieldNotFound { .. })
        ));
        assert!(matches!(
            from_str::<Shape>("<Dot;1>"),
            Err(Error::UnsupportedStructure { .. })
        ));
        assert!(from_str::<Shape>("<Hexagon;1>").is_err());
        assert_eq!(from_str::<Shape>("<Blank>").unwrap(), Shape::Blank {});
        assert_eq!(
            from_str::<Shape>("<Blank;ghost=1>"),
            Err(Error::field_not_found("Blank", "ghost"))
        );
        assert!(matches!(
            from_str::<Shape>("<Line;<Point;x=0;y=0>>"),
            Err(Error::UnsupportedStructure { .. })
        ));
    }

    #[test]
    fn test_type_name_checked() {
        assert_eq!(
            from_str::<Point>("<Vector;x=1;y=2>"),
            Err(Error::type_mismatch("Vector", "Point"))
        );
        let lenient = from_str_with_options::<Point>("<Vector;x=1;y=2>", Options::lenient());
        assert_eq!(lenient.unwrap(), Point { x: 1, y: 2 });
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            from_str::<Point>("<Point;x=1;y=2;z=3>"),
            Err(Error::field_not_found("Point", "z"))
        );
    }

    #[test]
    fn test_missing_field_is_field_access() {
        let err = from_str::<Point>("<Point;x=1>").unwrap_err();
        assert!(matches!(err, Error::FieldAccess(ref msg) if msg.contains("y")));
    }

    #[test]
    fn test_scalar_coercion_errors() {
        assert_eq!(
            from_str::<Point>("<Point;x=abc;y=2>"),
            Err(Error::invalid_value("i32", "abc"))
        );
        assert!(matches!(
            from_str::<u8>("<u8;256>"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            from_str::<String>("<Point;x=1>"),
            Err(Error::UnsupportedStructure { .. })
        ));
    }

    #[test]
    fn test_array_required_for_sequences() {
        assert_eq!(
            from_str::<Vec<i32>>("<Point;x=1>"),
            Err(Error::unsupported_structure("array", "Point"))
        );
        assert!(from_str::<Vec<i32>>("1").is_err());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            from_str::<Point>("<Point;x=1;y=2"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            from_str::<Point>("<Point;x=1;y>"),
            Err(Error::Malformed { offset: 11, .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let options = Options::new().with_max_depth(2);
        let ok: Vec<Vec<i32>> = from_str_with_options("<array;<array;1>>", options).unwrap();
        assert_eq!(ok, vec![vec![1]]);
        assert_eq!(
            from_str_with_options::<Vec<Vec<Vec<i32>>>>("<array;<array;<array>>>", options),
            Err(Error::DepthLimitExceeded(2))
        );
    }

    #[test]
    fn test_map_keys_unescaped() {
        let map: HashMap<String, i32> = from_str("<map;a&eqb=1;c&semi=2>").unwrap();
        assert_eq!(map["a=b"], 1);
        assert_eq!(map["c;"], 2);
    }

    #[test]
    fn test_map_tag_required() {
        assert!(matches!(
            from_str::<HashMap<String, String>>("<Point;x=1>"),
            Err(Error::UnsupportedStructure { .. })
        ));
        let lenient: HashMap<String, String> =
            from_str_with_options("<Point;x=1>", Options::lenient()).unwrap();
        assert_eq!(lenient["x"], "1");
        let array: Result<HashMap<String, String>, _> =
            from_str_with_options("<array;1>", Options::lenient());
        assert!(array.is_err());
    }

    #[test]
    fn test_flattened_fields_read_from_map() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Inner {
            a: String,
        }

        #[derive(Debug, PartialEq, Deserialize)]
        struct Outer {
            id: u32,
            #[serde(flatten)]
            inner: Inner,
        }

        assert_eq!(
            from_str::<Outer>("<map;id=1;a=x>").unwrap(),
            Outer {
                id: 1,
                inner: Inner { a: "x".to_string() }
            }
        );
    }

    #[test]
    fn test_untyped_fallback() {
        let json: serde_json::Value = from_str("<Point;x=1;tags=<array;a;&null>>").unwrap();
        assert_eq!(json, serde_json::json!({"x": "1", "tags": ["a", null]}));

        let json: serde_json::Value = from_str("<Circle;2.5;red>").unwrap();
        assert_eq!(json, serde_json::json!(["2.5", "red"]));
    }
}
