//! Serde serializer building a [`Variant`] tree.
//!
//! Rust integers keep their width where a matching kind exists: `u8` becomes
//! `Byte`, `i8`/`i16`/`i32` become `Int`, `u16`/`u32` become `UInt`, `i64`
//! is `Long` and `u64` is `ULong`. Byte slices become `ByteArray`.
//!
//! Enum variants with data are externally tagged: `{ "Variant": payload }`.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Serialize;
//! use variant_codec::{to_variant, Kind};
//!
//! #[derive(Serialize)]
//! struct Sample {
//!     id: u32,
//!     tags: Vec<String>,
//! }
//!
//! let v = to_variant(&Sample { id: 7, tags: vec!["a".into()] }).unwrap();
//! assert_eq!(v.kind(), Kind::Map);
//! assert_eq!(v.get("id").unwrap().kind(), Kind::UInt);
//! ```

use crate::{Error, Result, Variant, VariantList, VariantMap};
use serde::ser::{self, Serialize};

/// Serializes any `T: Serialize` into a [`Variant`].
pub fn to_variant<T: Serialize + ?Sized>(value: &T) -> Result<Variant> {
    value.serialize(VariantSerializer)
}

/// A serializer whose output is a [`Variant`].
pub struct VariantSerializer;

pub struct SerializeVec {
    list: VariantList,
}

pub struct SerializeTupleVariant {
    name: &'static str,
    list: VariantList,
}

pub struct SerializeMap {
    map: VariantMap,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: &'static str,
    map: VariantMap,
}

fn tagged(name: &str, payload: Variant) -> Result<Variant> {
    let mut map = VariantMap::with_capacity(1);
    map.insert(name.to_string(), payload)?;
    Ok(Variant::Map(map))
}

impl ser::Serializer for VariantSerializer {
    type Ok = Variant;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Variant> {
        Ok(Variant::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Variant> {
        Ok(Variant::Int(i32::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Variant> {
        Ok(Variant::Int(i32::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Variant> {
        Ok(Variant::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Variant> {
        Ok(Variant::Long(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Variant> {
        Ok(Variant::Byte(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Variant> {
        Ok(Variant::UInt(u32::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Variant> {
        Ok(Variant::UInt(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Variant> {
        Ok(Variant::ULong(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Variant> {
        Ok(Variant::Double(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Variant> {
        Ok(Variant::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Variant> {
        Ok(Variant::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Variant> {
        Ok(Variant::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Variant> {
        Ok(Variant::ByteArray(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Variant> {
        Ok(Variant::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Variant>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Variant> {
        Ok(Variant::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Variant> {
        Ok(Variant::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Variant> {
        Ok(Variant::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Variant>
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
    ) -> Result<Variant>
    where
        T: ?Sized + Serialize,
    {
        tagged(variant, to_variant(value)?)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant,
            list: VariantList::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant,
            map: VariantMap::with_capacity(len),
        })
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            list: VariantList::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize) -> Self {
        SerializeMap {
            map: VariantMap::with_capacity(capacity),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Variant;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.list.push(to_variant(value)?)
    }

    fn end(self) -> Result<Variant> {
        Ok(Variant::List(self.list))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Variant;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.list.push(to_variant(value)?)
    }

    fn end(self) -> Result<Variant> {
        Ok(Variant::List(self.list))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Variant;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.list.push(to_variant(value)?)
    }

    fn end(self) -> Result<Variant> {
        Ok(Variant::List(self.list))
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Variant;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.list.push(to_variant(value)?)
    }

    fn end(self) -> Result<Variant> {
        tagged(self.name, Variant::List(self.list))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Variant;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_variant(key)? {
            Variant::String(s) => s,
            Variant::List(_) | Variant::Map(_) | Variant::ByteArray(_) | Variant::Null => {
                return Err(Error::custom("map keys must be strings or scalars"))
            }
            // numeric and boolean keys use their display text, as JSON does
            scalar => scalar.to_string(),
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_variant(value)?)?;
        Ok(())
    }

    fn end(self) -> Result<Variant> {
        Ok(Variant::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Variant;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_variant(value)?)?;
        Ok(())
    }

    fn end(self) -> Result<Variant> {
        Ok(Variant::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Variant;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_variant(value)?)?;
        Ok(())
    }

    fn end(self) -> Result<Variant> {
        tagged(self.name, Variant::Map(self.map))
    }
}
