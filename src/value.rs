//! Dynamic value representation shared by every codec.
//!
//! This module provides the [`Variant`] enum, a closed tagged union over
//! thirteen kinds, and the conversion table that lets any scalar be read as
//! any other scalar type.
//!
//! ## Conversion rules
//!
//! - Numeric accessors ([`Variant::int_value`], [`Variant::double_value`], ...)
//!   are defined for `Bool`, `Byte`, `Int`, `UInt`, `Long`, `ULong`, `Double`
//!   and `DateTime`, and for `String` when its trimmed content parses as the
//!   requested number.
//! - [`Variant::boolean_value`] on a string is `false` only for an empty
//!   (trimmed) string, `"0"`, or `"false"` in any case.
//! - `Null` never fails a conversion: scalar accessors return zero and
//!   [`Variant::to_list`]/[`Variant::to_map`] return shared empty read-only
//!   containers.
//! - Everything else fails with [`Error::TypeMismatch`].
//!
//! ## Equality
//!
//! Variants compare by effective value, so `Bool(true) == Int(1)` and
//! `String("42") == Long(42)`. Lists and maps compare structurally but are not
//! ordered.
//!
//! ```rust
//! use variant_codec::Variant;
//!
//! assert_eq!(Variant::Bool(true), Variant::Int(1));
//! assert_eq!(Variant::from("0").boolean_value().unwrap(), false);
//! assert_eq!(Variant::from(" 0").boolean_value().unwrap(), false);
//! assert_eq!(Variant::from("0.0").boolean_value().unwrap(), true);
//! ```

use crate::{json, CloneOptions, Error, JsonOptions, Result, VariantList, VariantMap};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// The shared `Null` variant.
pub static NULL: Variant = Variant::Null;

fn empty_list() -> &'static VariantList {
    static EMPTY: OnceLock<VariantList> = OnceLock::new();
    EMPTY.get_or_init(VariantList::frozen)
}

fn empty_map() -> &'static VariantMap {
    static EMPTY: OnceLock<VariantMap> = OnceLock::new();
    EMPTY.get_or_init(VariantMap::frozen)
}

/// The kind tag of a [`Variant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Byte,
    Int,
    UInt,
    Long,
    ULong,
    Double,
    String,
    ByteArray,
    DateTime,
    List,
    Map,
}

impl Kind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Null => "NULL",
            Kind::Bool => "BOOL",
            Kind::Byte => "BYTE",
            Kind::Int => "INT",
            Kind::UInt => "UINT",
            Kind::Long => "LONG",
            Kind::ULong => "ULONG",
            Kind::Double => "DOUBLE",
            Kind::String => "STRING",
            Kind::ByteArray => "BYTEARRAY",
            Kind::DateTime => "DATETIME",
            Kind::List => "LIST",
            Kind::Map => "MAP",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically-typed value.
///
/// Scalars hold one payload of their native width. `DateTime` holds signed
/// milliseconds since the Unix epoch. `List` and `Map` own their children.
///
/// # Examples
///
/// ```rust
/// use variant_codec::{Kind, Variant, VariantMap};
///
/// let mut map = VariantMap::new();
/// map.put("id", 7u32).unwrap().put("name", "sensor").unwrap();
/// let value = Variant::from(map);
///
/// assert_eq!(value.kind(), Kind::Map);
/// assert_eq!(value.get("id").unwrap().long_value().unwrap(), 7);
/// ```
#[derive(Clone, Debug, Default)]
pub enum Variant {
    #[default]
    Null,
    Bool(bool),
    Byte(u8),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Double(f64),
    String(String),
    ByteArray(Vec<u8>),
    DateTime(i64),
    List(VariantList),
    Map(VariantMap),
}

/// Numeric payload used by the conversion table and by comparisons.
#[derive(Clone, Copy, Debug)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn to_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    fn num_eq(self, other: Numeric) -> bool {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => a == b,
            _ => self.to_f64() == other.to_f64(),
        }
    }

    fn num_cmp(self, other: Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(&b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    fn parse(text: &str) -> Option<Numeric> {
        let text = text.trim();
        text.parse::<i128>()
            .map(Numeric::Int)
            .or_else(|_| text.parse::<f64>().map(Numeric::Float))
            .ok()
    }
}

/// Java-style double text: whole values keep a trailing `.0`.
pub(crate) fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{:?}", value)
    }
}

impl Variant {
    /// Returns the kind tag of this variant.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Variant::Null => Kind::Null,
            Variant::Bool(_) => Kind::Bool,
            Variant::Byte(_) => Kind::Byte,
            Variant::Int(_) => Kind::Int,
            Variant::UInt(_) => Kind::UInt,
            Variant::Long(_) => Kind::Long,
            Variant::ULong(_) => Kind::ULong,
            Variant::Double(_) => Kind::Double,
            Variant::String(_) => Kind::String,
            Variant::ByteArray(_) => Kind::ByteArray,
            Variant::DateTime(_) => Kind::DateTime,
            Variant::List(_) => Kind::List,
            Variant::Map(_) => Kind::Map,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Variant::String(_))
    }

    /// Returns `true` for the kinds the numeric accessors read directly.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            Variant::Byte(_)
                | Variant::Int(_)
                | Variant::UInt(_)
                | Variant::Long(_)
                | Variant::ULong(_)
                | Variant::Double(_)
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Variant::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Variant::Map(_))
    }

    /// Returns `true` for `Null` and for empty strings, byte arrays, lists and maps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Variant::Null => true,
            Variant::String(s) => s.is_empty(),
            Variant::ByteArray(b) => b.is_empty(),
            Variant::List(l) => l.is_empty(),
            Variant::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    /// Number of children of a list or map; zero for every other kind.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Variant::List(l) => l.len(),
            Variant::Map(m) => m.len(),
            _ => 0,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a byte array, returns a reference to its bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Variant::ByteArray(b) => Some(b),
            _ => None,
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.kind().name())
    }

    fn numeric(&self) -> Option<Numeric> {
        match self {
            Variant::Null => Some(Numeric::Int(0)),
            Variant::Bool(b) => Some(Numeric::Int(i128::from(*b))),
            Variant::Byte(v) => Some(Numeric::Int(i128::from(*v))),
            Variant::Int(v) => Some(Numeric::Int(i128::from(*v))),
            Variant::UInt(v) => Some(Numeric::Int(i128::from(*v))),
            Variant::Long(v) | Variant::DateTime(v) => Some(Numeric::Int(i128::from(*v))),
            Variant::ULong(v) => Some(Numeric::Int(i128::from(*v))),
            Variant::Double(v) => Some(Numeric::Float(*v)),
            _ => None,
        }
    }

    /// Numeric value used for comparisons; strings are parsed.
    fn effective(&self) -> Option<Numeric> {
        match self {
            Variant::Null => None,
            Variant::String(s) => Numeric::parse(s),
            _ => self.numeric(),
        }
    }

    fn convert<T: FromStr>(
        &self,
        target: &str,
        from_int: fn(i128) -> T,
        from_float: fn(f64) -> T,
    ) -> Result<T> {
        if let Variant::String(s) = self {
            return s.trim().parse::<T>().map_err(|_| Error::format(s, target));
        }
        match self.numeric() {
            Some(Numeric::Int(i)) => Ok(from_int(i)),
            Some(Numeric::Float(f)) => Ok(from_float(f)),
            None => Err(self.mismatch(target)),
        }
    }

    /// Returns the variant as a boolean.
    ///
    /// Numbers are `true` when non-zero. Strings are `false` only when their
    /// trimmed content is empty, `"0"`, or `"false"` in any case.
    pub fn boolean_value(&self) -> Result<bool> {
        match self {
            Variant::String(s) => {
                let t = s.trim();
                Ok(!(t.is_empty() || t == "0" || t.eq_ignore_ascii_case("false")))
            }
            _ => match self.numeric() {
                Some(Numeric::Int(i)) => Ok(i != 0),
                Some(Numeric::Float(f)) => Ok(f != 0.0),
                None => Err(self.mismatch("a boolean")),
            },
        }
    }

    /// Returns the variant as a byte, truncating wider integers.
    pub fn byte_value(&self) -> Result<u8> {
        self.convert("a byte", |i| i as u8, |f| f as u8)
    }

    /// Returns the variant as a short, truncating wider integers.
    pub fn short_value(&self) -> Result<i16> {
        self.convert("a short", |i| i as i16, |f| f as i16)
    }

    /// Returns the variant as an integer, truncating wider integers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::Variant;
    ///
    /// assert_eq!(Variant::from(" 42 ").int_value().unwrap(), 42);
    /// assert_eq!(Variant::Double(3.9).int_value().unwrap(), 3);
    /// assert_eq!(Variant::Null.int_value().unwrap(), 0);
    /// assert!(Variant::from("4x").int_value().is_err());
    /// ```
    pub fn int_value(&self) -> Result<i32> {
        self.convert("an integer", |i| i as i32, |f| f as i32)
    }

    /// Returns the variant as a long, truncating wider integers.
    pub fn long_value(&self) -> Result<i64> {
        self.convert("a long", |i| i as i64, |f| f as i64)
    }

    pub fn float_value(&self) -> Result<f32> {
        self.convert("a float", |i| i as f32, |f| f as f32)
    }

    pub fn double_value(&self) -> Result<f64> {
        self.convert("a double", |i| i as f64, |f| f)
    }

    /// Returns the raw bytes of the variant.
    ///
    /// Numbers yield the little-endian bytes of their native width, strings
    /// their UTF-8 bytes, and `Null` an empty vector.
    pub fn to_byte_array(&self) -> Result<Vec<u8>> {
        Ok(match self {
            Variant::Null => Vec::new(),
            Variant::Bool(b) => vec![u8::from(*b)],
            Variant::Byte(v) => vec![*v],
            Variant::Int(v) => v.to_le_bytes().to_vec(),
            Variant::UInt(v) => v.to_le_bytes().to_vec(),
            Variant::Long(v) | Variant::DateTime(v) => v.to_le_bytes().to_vec(),
            Variant::ULong(v) => v.to_le_bytes().to_vec(),
            Variant::Double(v) => v.to_le_bytes().to_vec(),
            Variant::String(s) => s.as_bytes().to_vec(),
            Variant::ByteArray(b) => b.clone(),
            Variant::List(_) | Variant::Map(_) => return Err(self.mismatch("a byte array")),
        })
    }

    /// Returns the list payload. `Null` yields a shared empty read-only list.
    pub fn to_list(&self) -> Result<&VariantList> {
        match self {
            Variant::List(l) => Ok(l),
            Variant::Null => Ok(empty_list()),
            _ => Err(self.mismatch("a list")),
        }
    }

    /// Returns the map payload. `Null` yields a shared empty read-only map.
    pub fn to_map(&self) -> Result<&VariantMap> {
        match self {
            Variant::Map(m) => Ok(m),
            Variant::Null => Ok(empty_map()),
            _ => Err(self.mismatch("a map")),
        }
    }

    pub fn to_list_mut(&mut self) -> Result<&mut VariantList> {
        match self {
            Variant::List(l) => Ok(l),
            Variant::Null => Err(Error::ReadOnly),
            _ => Err(self.mismatch("a list")),
        }
    }

    pub fn to_map_mut(&mut self) -> Result<&mut VariantMap> {
        match self {
            Variant::Map(m) => Ok(m),
            Variant::Null => Err(Error::ReadOnly),
            _ => Err(self.mismatch("a map")),
        }
    }

    /// Zero-padded upper-case hex of a number's native width.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::Variant;
    ///
    /// assert_eq!(Variant::Byte(0x1f).to_hex_string().unwrap(), "1F");
    /// assert_eq!(Variant::Int(-1).to_hex_string().unwrap(), "FFFFFFFF");
    /// ```
    pub fn to_hex_string(&self) -> Result<String> {
        Ok(match self {
            Variant::Null => "0".to_string(),
            Variant::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Variant::Byte(v) => format!("{:02X}", v),
            Variant::Int(v) => format!("{:08X}", v),
            Variant::UInt(v) => format!("{:08X}", v),
            Variant::Long(v) | Variant::DateTime(v) => format!("{:016X}", v),
            Variant::ULong(v) => format!("{:016X}", v),
            Variant::Double(v) => format!("{:016X}", *v as i64),
            _ => return Err(self.mismatch("a hex string")),
        })
    }

    /// Reads the variant as a UTC timestamp in epoch milliseconds.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let millis = match self {
            Variant::DateTime(ms) => *ms,
            Variant::String(_) | Variant::ByteArray(_) | Variant::List(_) | Variant::Map(_) => {
                return Err(self.mismatch("a date-time"))
            }
            _ => self.long_value()?,
        };
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| Error::format(&millis.to_string(), "a date-time"))
    }

    /// Looks up `key` in a map.
    ///
    /// Fails with [`Error::KeyNotFound`] on a missing key or on `Null`.
    pub fn get(&self, key: &str) -> Result<&Variant> {
        match self {
            Variant::Map(m) => m.require(key),
            Variant::Null => Err(Error::KeyNotFound(key.to_string())),
            _ => Err(self.mismatch("a map")),
        }
    }

    /// Looks up `key`, falling back to `default` when absent or not a map.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Variant) -> &'a Variant {
        match self {
            Variant::Map(m) => m.get_or(key, default),
            _ => default,
        }
    }

    /// Returns the list element at `index`. `Null` yields `Null` for any index.
    pub fn at(&self, index: usize) -> Result<&Variant> {
        match self {
            Variant::List(l) => l.get(index).ok_or_else(|| {
                Error::custom(format!("index {} out of bounds (len {})", index, l.len()))
            }),
            Variant::Null => Ok(&NULL),
            _ => Err(self.mismatch("a list")),
        }
    }

    /// Copies this variant.
    ///
    /// See [`CloneOptions`] for the shallow/deep and read-only semantics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::{variant, CloneOptions};
    ///
    /// let tree = variant!({ "inner": [1, 2] });
    /// let frozen = tree.clone_with(CloneOptions::deep().read_only());
    ///
    /// assert_eq!(frozen, tree);
    /// assert!(frozen.to_map().unwrap().is_read_only());
    /// assert!(frozen.get("inner").unwrap().to_list().unwrap().is_read_only());
    /// ```
    #[must_use]
    pub fn clone_with(&self, options: CloneOptions) -> Variant {
        match self {
            Variant::List(list) => {
                let mut copy: VariantList = if options.deep {
                    list.iter().map(|v| v.clone_with(options)).collect()
                } else {
                    list.clone()
                };
                copy.set_read_only(options.read_only);
                Variant::List(copy)
            }
            Variant::Map(map) => {
                let mut copy: VariantMap = if options.deep {
                    map.iter()
                        .map(|(k, v)| (k.clone(), v.clone_with(options)))
                        .collect()
                } else {
                    map.clone()
                };
                copy.set_read_only(options.read_only);
                Variant::Map(copy)
            }
            other => other.clone(),
        }
    }

    /// Orders two variants by effective value.
    ///
    /// `Null` sorts before everything else. Fails with
    /// [`Error::Unsupported`] when either side is a list or a map, or when a
    /// `NaN` is involved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::cmp::Ordering;
    /// use variant_codec::Variant;
    ///
    /// assert_eq!(Variant::Int(2).compare(&Variant::Double(2.5)).unwrap(), Ordering::Less);
    /// assert_eq!(Variant::from("10").compare(&Variant::Byte(9)).unwrap(), Ordering::Greater);
    /// ```
    pub fn compare(&self, other: &Variant) -> Result<Ordering> {
        match (self, other) {
            (Variant::List(_) | Variant::Map(_), _) | (_, Variant::List(_) | Variant::Map(_)) => {
                Err(Error::unsupported(&format!(
                    "{} cannot be compared to {}",
                    self.kind(),
                    other.kind()
                )))
            }
            (Variant::Null, Variant::Null) => Ok(Ordering::Equal),
            (Variant::Null, _) => Ok(Ordering::Less),
            (_, Variant::Null) => Ok(Ordering::Greater),
            (Variant::String(a), Variant::String(b)) => Ok(a.cmp(b)),
            (Variant::ByteArray(a), Variant::ByteArray(b)) => Ok(a.cmp(b)),
            _ => match (self.effective(), other.effective()) {
                (Some(a), Some(b)) => a
                    .num_cmp(b)
                    .ok_or_else(|| Error::unsupported("NaN cannot be ordered")),
                _ => Ok(self.to_string().cmp(&other.to_string())),
            },
        }
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variant::List(a), Variant::List(b)) => a == b,
            (Variant::Map(a), Variant::Map(b)) => a == b,
            (Variant::List(_) | Variant::Map(_), _) | (_, Variant::List(_) | Variant::Map(_)) => {
                false
            }
            (Variant::Null, Variant::Null) => true,
            (Variant::Null, _) | (_, Variant::Null) => false,
            (Variant::String(a), Variant::String(b)) => a == b,
            (Variant::ByteArray(a), Variant::ByteArray(b)) => a == b,
            (Variant::ByteArray(_), _) | (_, Variant::ByteArray(_)) => false,
            _ => match (self.effective(), other.effective()) {
                (Some(a), Some(b)) => a.num_eq(b),
                _ => false,
            },
        }
    }
}

impl PartialOrd for Variant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => f.write_str("null"),
            Variant::Bool(b) => write!(f, "{}", b),
            Variant::Byte(v) => write!(f, "{}", v),
            Variant::Int(v) => write!(f, "{}", v),
            Variant::UInt(v) => write!(f, "{}", v),
            Variant::Long(v) | Variant::DateTime(v) => write!(f, "{}", v),
            Variant::ULong(v) => write!(f, "{}", v),
            Variant::Double(v) => f.write_str(&format_double(*v)),
            Variant::String(s) => f.write_str(s),
            Variant::ByteArray(bytes) => {
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Variant::List(_) | Variant::Map(_) => {
                f.write_str(&json::to_text(self, &JsonOptions::new().with_indent(4)))
            }
        }
    }
}

impl Serialize for Variant {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Variant::Null => serializer.serialize_unit(),
            Variant::Bool(b) => serializer.serialize_bool(*b),
            Variant::Byte(v) => serializer.serialize_u8(*v),
            Variant::Int(v) => serializer.serialize_i32(*v),
            Variant::UInt(v) => serializer.serialize_u32(*v),
            Variant::Long(v) | Variant::DateTime(v) => serializer.serialize_i64(*v),
            Variant::ULong(v) => serializer.serialize_u64(*v),
            Variant::Double(v) => serializer.serialize_f64(*v),
            Variant::String(s) => serializer.serialize_str(s),
            Variant::ByteArray(b) => serializer.serialize_bytes(b),
            Variant::List(list) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for element in list {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Variant::Map(map) => {
                use serde::ser::SerializeMap;
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    state.serialize_entry(k, v)?;
                }
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct VariantVisitor;

        impl<'de> Visitor<'de> for VariantVisitor {
            type Value = Variant;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid variant value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Variant, E> {
                Ok(Variant::Bool(value))
            }

            fn visit_u8<E>(self, value: u8) -> std::result::Result<Variant, E> {
                Ok(Variant::Byte(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Variant, E> {
                Ok(match i32::try_from(value) {
                    Ok(v) => Variant::Int(v),
                    Err(_) => Variant::Long(value),
                })
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Variant, E> {
                if let Ok(v) = i32::try_from(value) {
                    Ok(Variant::Int(v))
                } else if let Ok(v) = i64::try_from(value) {
                    Ok(Variant::Long(v))
                } else {
                    Ok(Variant::ULong(value))
                }
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Variant, E> {
                Ok(Variant::Double(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Variant, E> {
                Ok(Variant::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Variant, E> {
                Ok(Variant::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Variant, E> {
                Ok(Variant::ByteArray(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Variant, E> {
                Ok(Variant::ByteArray(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Variant, E> {
                Ok(Variant::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Variant, E> {
                Ok(Variant::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Variant, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Variant, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut list = VariantList::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    list.push(elem).map_err(de::Error::custom)?;
                }
                Ok(Variant::List(list))
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Variant, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut map = VariantMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Variant>()? {
                    map.insert(key, value).map_err(de::Error::custom)?;
                }
                Ok(Variant::Map(map))
            }
        }

        deserializer.deserialize_any(VariantVisitor)
    }
}

// TryFrom implementations for extracting values from Variant
impl TryFrom<Variant> for i64 {
    type Error = crate::Error;

    fn try_from(value: Variant) -> crate::Result<Self> {
        value.long_value()
    }
}

impl TryFrom<Variant> for f64 {
    type Error = crate::Error;

    fn try_from(value: Variant) -> crate::Result<Self> {
        value.double_value()
    }
}

impl TryFrom<Variant> for bool {
    type Error = crate::Error;

    fn try_from(value: Variant) -> crate::Result<Self> {
        value.boolean_value()
    }
}

impl TryFrom<Variant> for String {
    type Error = crate::Error;

    fn try_from(value: Variant) -> crate::Result<Self> {
        match value {
            Variant::String(s) => Ok(s),
            Variant::List(_) | Variant::Map(_) => Err(value.mismatch("a string")),
            other => Ok(other.to_string()),
        }
    }
}

// From implementations for creating Variant from primitives
impl From<()> for Variant {
    fn from(_: ()) -> Self {
        Variant::Null
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<u8> for Variant {
    fn from(value: u8) -> Self {
        Variant::Byte(value)
    }
}

impl From<i8> for Variant {
    fn from(value: i8) -> Self {
        Variant::Int(i32::from(value))
    }
}

impl From<i16> for Variant {
    fn from(value: i16) -> Self {
        Variant::Int(i32::from(value))
    }
}

impl From<u16> for Variant {
    fn from(value: u16) -> Self {
        Variant::UInt(u32::from(value))
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::Int(value)
    }
}

impl From<u32> for Variant {
    fn from(value: u32) -> Self {
        Variant::UInt(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Long(value)
    }
}

impl From<u64> for Variant {
    fn from(value: u64) -> Self {
        Variant::ULong(value)
    }
}

impl From<f32> for Variant {
    fn from(value: f32) -> Self {
        Variant::Double(f64::from(value))
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Double(value)
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<Vec<u8>> for Variant {
    fn from(value: Vec<u8>) -> Self {
        Variant::ByteArray(value)
    }
}

impl From<&[u8]> for Variant {
    fn from(value: &[u8]) -> Self {
        Variant::ByteArray(value.to_vec())
    }
}

impl From<DateTime<Utc>> for Variant {
    fn from(value: DateTime<Utc>) -> Self {
        Variant::DateTime(value.timestamp_millis())
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(value: Vec<Variant>) -> Self {
        Variant::List(VariantList::from(value))
    }
}

impl From<VariantList> for Variant {
    fn from(value: VariantList) -> Self {
        Variant::List(value)
    }
}

impl From<VariantMap> for Variant {
    fn from(value: VariantMap) -> Self {
        Variant::Map(value)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(value: Option<T>) -> Self {
        value.map_or(Variant::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_truthiness() {
        for falsy in ["", "   ", "0", " 0", "false", "FALSE", " False "] {
            assert!(!Variant::from(falsy).boolean_value().unwrap(), "{falsy:?}");
        }
        for truthy in ["0.0", "00", "no", "true", "1", "x"] {
            assert!(Variant::from(truthy).boolean_value().unwrap(), "{truthy:?}");
        }
    }

    #[test]
    fn test_numeric_truthiness() {
        assert!(!Variant::Double(0.0).boolean_value().unwrap());
        assert!(Variant::Double(0.1).boolean_value().unwrap());
        assert!(Variant::ULong(u64::MAX).boolean_value().unwrap());
        assert!(!Variant::DateTime(0).boolean_value().unwrap());
    }

    #[test]
    fn test_null_never_fails() {
        let null = Variant::Null;
        assert!(!null.boolean_value().unwrap());
        assert_eq!(null.byte_value().unwrap(), 0);
        assert_eq!(null.short_value().unwrap(), 0);
        assert_eq!(null.int_value().unwrap(), 0);
        assert_eq!(null.long_value().unwrap(), 0);
        assert_eq!(null.float_value().unwrap(), 0.0);
        assert_eq!(null.double_value().unwrap(), 0.0);
        assert!(null.to_byte_array().unwrap().is_empty());
        assert!(null.to_list().unwrap().is_empty());
        assert!(null.to_map().unwrap().is_empty());
        assert!(null.to_list().unwrap().is_read_only());
        assert_eq!(null.to_string(), "null");
    }

    #[test]
    fn test_container_accessors_mismatch() {
        let map = Variant::Map(VariantMap::new());
        assert!(matches!(map.int_value(), Err(Error::TypeMismatch { .. })));
        assert!(matches!(map.boolean_value(), Err(Error::TypeMismatch { .. })));
        assert!(matches!(map.to_list(), Err(Error::TypeMismatch { .. })));
        assert!(matches!(
            Variant::Int(1).to_map(),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            Variant::from("x").to_list(),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_string_parse_errors() {
        assert!(matches!(
            Variant::from("12a").long_value(),
            Err(Error::Format { .. })
        ));
        assert!(matches!(
            Variant::from("300").byte_value(),
            Err(Error::Format { .. })
        ));
        assert_eq!(Variant::from(" -7 ").short_value().unwrap(), -7);
        assert_eq!(Variant::from("2.5").double_value().unwrap(), 2.5);
    }

    #[test]
    fn test_narrowing_truncates() {
        assert_eq!(Variant::Int(0x1234).byte_value().unwrap(), 0x34);
        assert_eq!(Variant::Long(1 << 32).int_value().unwrap(), 0);
        assert_eq!(Variant::Bool(true).long_value().unwrap(), 1);
    }

    #[test]
    fn test_cross_kind_equality() {
        assert_eq!(Variant::Bool(true), Variant::Int(1));
        assert_eq!(Variant::UInt(5), Variant::Long(5));
        assert_eq!(Variant::Double(2.0), Variant::Byte(2));
        assert_eq!(Variant::from("42"), Variant::ULong(42));
        assert_eq!(Variant::DateTime(10), Variant::Long(10));
        assert_ne!(Variant::Null, Variant::Int(0));
        assert_ne!(Variant::from("abc"), Variant::Int(0));
        assert_ne!(Variant::ByteArray(vec![1]), Variant::Int(1));
    }

    #[test]
    fn test_containers_are_not_ordered() {
        let list = Variant::from(vec![Variant::Int(1)]);
        assert!(matches!(
            list.compare(&Variant::Int(1)),
            Err(Error::Unsupported(_))
        ));
        assert_eq!(list.partial_cmp(&list), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::Double(1.0).to_string(), "1.0");
        assert_eq!(Variant::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Variant::ByteArray(vec![0x0a, 0xff]).to_string(), "0a ff");
        assert_eq!(Variant::DateTime(1_500).to_string(), "1500");
        assert_eq!(
            Variant::from(vec![Variant::Int(1)]).to_string(),
            "[\n    1\n]"
        );
    }

    #[test]
    fn test_to_byte_array_little_endian() {
        assert_eq!(Variant::Int(1).to_byte_array().unwrap(), vec![1, 0, 0, 0]);
        assert_eq!(
            Variant::ULong(0x0102).to_byte_array().unwrap(),
            vec![2, 1, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(Variant::from("hé").to_byte_array().unwrap(), "hé".as_bytes());
    }

    #[test]
    fn test_datetime_interop() {
        let dt = Utc.timestamp_millis_opt(1_700_000_000_123).single().unwrap();
        let v = Variant::from(dt);
        assert_eq!(v, Variant::DateTime(1_700_000_000_123));
        assert_eq!(v.to_datetime().unwrap(), dt);
    }

    #[test]
    fn test_shallow_clone_keeps_children() {
        let mut inner = VariantList::new();
        inner.add(1).unwrap();
        inner.set_read_only(true);
        let mut outer = VariantList::new();
        outer.push(Variant::List(inner)).unwrap();
        let tree = Variant::List(outer);

        let copy = tree.clone_with(CloneOptions::shallow());
        assert!(!copy.to_list().unwrap().is_read_only());
        assert!(copy.at(0).unwrap().to_list().unwrap().is_read_only());

        let deep = tree.clone_with(CloneOptions::deep());
        assert!(!deep.at(0).unwrap().to_list().unwrap().is_read_only());
    }

    #[test]
    fn test_get_on_null_and_missing() {
        assert!(matches!(Variant::Null.get("a"), Err(Error::KeyNotFound(_))));
        assert_eq!(Variant::Null.at(3).unwrap(), &Variant::Null);
        let fallback = Variant::from(9);
        assert_eq!(Variant::Int(1).get_or("a", &fallback), &fallback);
    }
}
