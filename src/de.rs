//! Serde deserializer reading Rust values out of a [`Variant`] tree.
//!
//! Most users go through the crate-level helpers such as
//! [`from_json_str`](crate::from_json_str), which decode a document and then
//! call [`from_variant`].
//!
//! ```rust
//! use serde::Deserialize;
//! use variant_codec::{from_variant, variant};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let point: Point = from_variant(variant!({ "x": 1, "y": 2 })).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```
//!
//! A `ByteArray` can be read as a `Vec<u8>`, and an enum variant with data
//! is read from a single-entry map keyed by the variant name.

use crate::{Error, Result, Variant, VariantList, VariantMap};
use serde::de::{self, DeserializeOwned};
use serde::forward_to_deserialize_any;

/// Deserializes a `T` from an owned variant.
pub fn from_variant<T: DeserializeOwned>(value: Variant) -> Result<T> {
    T::deserialize(VariantDeserializer::new(value))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Variant>,
}

impl SeqDeserializer {
    fn new(list: VariantList) -> Self {
        SeqDeserializer {
            iter: list.into_iter(),
        }
    }

    fn from_bytes(bytes: Vec<u8>) -> Self {
        SeqDeserializer {
            iter: bytes
                .into_iter()
                .map(Variant::Byte)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(VariantDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Variant>,
    value: Option<Variant>,
}

impl MapDeserializer {
    fn new(map: VariantMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(VariantDeserializer::new(Variant::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(VariantDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    name: String,
    payload: Option<Variant>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = EnumPayload;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name = seed.deserialize(VariantDeserializer::new(Variant::String(self.name)))?;
        Ok((
            name,
            EnumPayload {
                payload: self.payload,
            },
        ))
    }
}

struct EnumPayload {
    payload: Option<Variant>,
}

impl<'de> de::VariantAccess<'de> for EnumPayload {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.payload {
            Some(Variant::Null) | None => Ok(()),
            Some(other) => Err(Error::type_mismatch("a unit variant", other.kind().name())),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.payload {
            Some(value) => seed.deserialize(VariantDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.payload {
            Some(Variant::List(list)) => visitor.visit_seq(SeqDeserializer::new(list)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.payload {
            Some(Variant::Map(map)) => visitor.visit_map(MapDeserializer::new(map)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

/// A deserializer over an owned [`Variant`].
pub struct VariantDeserializer {
    value: Variant,
}

impl VariantDeserializer {
    #[must_use]
    pub fn new(value: Variant) -> Self {
        VariantDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for VariantDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variant::Null => visitor.visit_unit(),
            Variant::Bool(b) => visitor.visit_bool(b),
            Variant::Byte(v) => visitor.visit_u8(v),
            Variant::Int(v) => visitor.visit_i32(v),
            Variant::UInt(v) => visitor.visit_u32(v),
            Variant::Long(v) | Variant::DateTime(v) => visitor.visit_i64(v),
            Variant::ULong(v) => visitor.visit_u64(v),
            Variant::Double(v) => visitor.visit_f64(v),
            Variant::String(s) => visitor.visit_string(s),
            Variant::ByteArray(bytes) => visitor.visit_byte_buf(bytes),
            Variant::List(list) => visitor.visit_seq(SeqDeserializer::new(list)),
            Variant::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variant::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variant::ByteArray(bytes) => visitor.visit_seq(SeqDeserializer::from_bytes(bytes)),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Variant::String(name) => visitor.visit_enum(EnumDeserializer {
                name,
                payload: None,
            }),
            Variant::Map(map) if map.len() == 1 => {
                let mut entries = map.into_iter();
                match entries.next() {
                    Some((name, payload)) => visitor.visit_enum(EnumDeserializer {
                        name,
                        payload: Some(payload),
                    }),
                    None => Err(Error::custom("expected a single-entry map for an enum")),
                }
            }
            other => Err(Error::type_mismatch(
                "an enum (string or single-entry map)",
                other.kind().name(),
            )),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple
        tuple_struct map struct identifier ignored_any
    }
}
