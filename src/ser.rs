//! Spytext serialization.
//!
//! This module provides the [`Serializer`] that turns any `Serialize` value
//! into a single self-describing string.
//!
//! ## Overview
//!
//! - **Objects**: structs become `<TypeName;field=value;...>`, fields in declaration order
//! - **Arrays**: sequences and tuples become `<array;value;...>`
//! - **Null**: `None` and `()` become `&null` (`<null>` at the root)
//! - **Scalars**: everything else is its `Display` text with `&;<>` escaped
//! - **Root scalars**: a bare scalar at the root is wrapped with its type, e.g. `<i32;42>`
//!
//! ## Usage
//!
//! ```rust
//! use serde_spytext::to_string;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "<Point;x=1;y=2>");
//! assert_eq!(to_string(&vec!["a", "b"]).unwrap(), "<array;a;b>");
//! assert_eq!(to_string(&None::<Point>).unwrap(), "<null>");
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_spytext::{Serializer, Options};
//! use serde::Serialize;
//!
//! let mut serializer = Serializer::new(Options::new());
//! "a;b".serialize(&mut serializer).unwrap();
//! assert_eq!(serializer.into_inner(), "<String;a&semib>");
//! ```

use crate::escape::push_escaped;
use crate::{Error, Options, Result};
use serde::{ser, Serialize};

pub(crate) const NULL: &str = "&null";
pub(crate) const ROOT_NULL: &str = "<null>";
pub(crate) const ARRAY_TAG: &str = "array";
pub(crate) const MAP_TAG: &str = "map";

/// The spytext serializer.
///
/// Writes directly into an owned `String`; nested units are streamed in place.
pub struct Serializer {
    output: String,
    options: Options,
    depth: usize,
}

impl Serializer {
    pub fn new(options: Options) -> Self {
        Serializer {
            output: String::with_capacity(128),
            options,
            depth: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    #[inline]
    fn at_root(&self) -> bool {
        self.depth == 0
    }

    /// Writes `<tag` and enters one nesting level.
    fn open_unit(&mut self, tag: &str) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }
        self.depth += 1;
        self.output.push('<');
        self.output.push_str(tag);
        Ok(())
    }

    fn close_unit(&mut self) {
        self.output.push('>');
        self.depth -= 1;
    }

    /// Writes already-safe scalar text, wrapping it as `<type;text>` at the root.
    fn write_scalar(&mut self, type_name: &str, text: &str) -> Result<()> {
        if self.at_root() {
            self.output.push('<');
            self.output.push_str(type_name);
            self.output.push(';');
            self.output.push_str(text);
            self.output.push('>');
        } else {
            self.output.push_str(text);
        }
        Ok(())
    }

    fn write_escaped_scalar(&mut self, type_name: &str, raw: &str) -> Result<()> {
        let mut text = String::with_capacity(raw.len());
        push_escaped(&mut text, raw);
        self.write_scalar(type_name, &text)
    }

    fn write_null(&mut self) {
        self.output
            .push_str(if self.at_root() { ROOT_NULL } else { NULL });
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = StructSerializer<'a>;
    type SerializeTupleVariant = SeqSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = StructSerializer<'a>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        self.write_scalar("bool", if v { "true" } else { "false" })
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.write_scalar("i8", &v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.write_scalar("i16", &v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.write_scalar("i32", &v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        self.write_scalar("i64", &v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok> {
        self.write_scalar("i128", &v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.write_scalar("u8", &v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.write_scalar("u16", &v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.write_scalar("u32", &v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        self.write_scalar("u64", &v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok> {
        self.write_scalar("u128", &v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        self.write_scalar("f32", &v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        self.write_scalar("f64", &v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        let mut buf = [0u8; 4];
        self.write_escaped_scalar("char", v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        self.write_escaped_scalar("String", v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        use ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        self.write_null();
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        self.write_null();
        Ok(())
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok> {
        self.open_unit(name)?;
        self.close_unit();
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        self.write_escaped_scalar(name, variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        self.open_unit(variant)?;
        self.output.push(';');
        value.serialize(&mut *self)?;
        self.close_unit();
        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.open_unit(ARRAY_TAG)?;
        Ok(SeqSerializer { ser: self })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.open_unit(name)?;
        Ok(StructSerializer {
            ser: self,
            index: 0,
        })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.open_unit(variant)?;
        Ok(SeqSerializer { ser: self })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.open_unit(MAP_TAG)?;
        Ok(MapSerializer { ser: self })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.open_unit(name)?;
        Ok(StructSerializer {
            ser: self,
            index: 0,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.open_unit(variant)?;
        Ok(StructSerializer {
            ser: self,
            index: 0,
        })
    }
}

/// Writes `;element` segments of an `<array;...>` or tuple variant unit.
pub struct SeqSerializer<'a> {
    ser: &'a mut Serializer,
}

impl<'a> SeqSerializer<'a> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.output.push(';');
        value.serialize(&mut *self.ser)
    }
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.close_unit();
        Ok(())
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.close_unit();
        Ok(())
    }
}

impl<'a> ser::SerializeTupleVariant for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.close_unit();
        Ok(())
    }
}

/// Writes `;name=value` field segments of an object unit.
///
/// Tuple structs use their positional index as the field name.
pub struct StructSerializer<'a> {
    ser: &'a mut Serializer,
    index: usize,
}

impl<'a> StructSerializer<'a> {
    fn field<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.output.push(';');
        self.ser.output.push_str(key);
        self.ser.output.push('=');
        value.serialize(&mut *self.ser)
    }
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.close_unit();
        Ok(())
    }
}

impl<'a> ser::SerializeStructVariant for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.close_unit();
        Ok(())
    }
}

impl<'a> ser::SerializeTupleStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.index.to_string();
        self.index += 1;
        self.field(&key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.close_unit();
        Ok(())
    }
}

/// Writes `;key=value` segments of a `<map;...>` unit.
pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let mut key_ser = Serializer {
            output: String::new(),
            options: self.ser.options,
            depth: self.ser.depth,
        };
        key.serialize(&mut key_ser)?;
        let text = key_ser.into_inner();
        if text.starts_with('<') || text == NULL {
            return Err(Error::unsupported_structure("scalar map key", &text));
        }

        self.ser.output.push(';');
        // the key is already escaped, so any '=' left in it is literal
        self.ser.output.push_str(&text.replace('=', "&eq"));
        self.ser.output.push('=');
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.close_unit();
        Ok(())
    }
}
