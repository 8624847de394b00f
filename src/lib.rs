//! # variant_codec
//!
//! A dynamically-typed [`Variant`] value model with JSON, BSON and BCON
//! codecs.
//!
//! ## What is a Variant?
//!
//! A [`Variant`] is a tagged union over thirteen kinds: `Null`, `Bool`,
//! `Byte`, `Int`, `UInt`, `Long`, `ULong`, `Double`, `String`, `ByteArray`,
//! `DateTime`, `List` and `Map`. Any scalar can be read as any other scalar
//! type through a fixed conversion table, and variants compare by effective
//! value, so `Bool(true) == Int(1)`.
//!
//! ## Key Features
//!
//! - **Three wire formats**: JSON text, BSON documents, and BCON, a compact
//!   binary encoding with tiered blob lengths
//! - **Streaming parsers**: every decoder implements [`Parser`] over any
//!   [`ByteSource`], with a non-blocking mode
//! - **Serde bridge**: any `T: Serialize` converts to a [`Variant`] and back
//! - **Read-only trees**: deep or shallow copies that reject mutation
//!
//! ## Quick Start
//!
//! ```rust
//! use variant_codec::{new_parser, serialize, variant, Format};
//!
//! let value = variant!({ "id": 7, "tags": ["a", "b"] });
//!
//! let mut bytes = Vec::new();
//! serialize(&mut bytes, &value, Format::Bcon, 0).unwrap();
//!
//! let mut parser = new_parser(&bytes[..], Format::Bcon);
//! let decoded = parser.next(true).unwrap().unwrap();
//! assert_eq!(decoded, value);
//! ```
//!
//! ### Typed data
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use variant_codec::{from_json_str, to_json_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//! let json = to_json_string(&user).unwrap();
//! assert_eq!(json, r#"{"id": 123, "name": "Alice", "active": true}"#);
//!
//! let back: User = from_json_str(&json).unwrap();
//! assert_eq!(user, back);
//! ```

pub mod bcon;
pub mod bson;
pub mod de;
pub mod error;
pub mod io;
pub mod json;
pub mod list;
pub mod macros;
pub mod map;
pub mod number;
pub mod options;
pub mod ser;
pub mod value;

pub use de::{from_variant, VariantDeserializer};
pub use error::{Error, Result};
pub use io::{ByteSource, Parser, MAX_NESTING_DEPTH};
pub use list::VariantList;
pub use map::VariantMap;
pub use number::IntWidth;
pub use options::{CloneOptions, JsonOptions, FORMAT_JSON_COMPACT, JSON_INDENT_MASK};
pub use ser::{to_variant, VariantSerializer};
pub use value::{Kind, Variant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// Wire formats understood by [`new_parser`] and [`serialize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Bson,
    Bcon,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Bson => "BSON",
            Format::Bcon => "BCON",
        })
    }
}

/// Creates a streaming parser for `format` over `source`.
///
/// # Examples
///
/// ```rust
/// use variant_codec::{new_parser, Format};
///
/// let mut parser = new_parser(&b"[1, 2]"[..], Format::Json);
/// assert_eq!(parser.next(true).unwrap().unwrap().len(), 2);
/// assert_eq!(parser.next(false).unwrap(), None);
/// ```
pub fn new_parser<'a, S>(source: S, format: Format) -> Box<dyn Parser + 'a>
where
    S: ByteSource + 'a,
{
    match format {
        Format::Json => Box::new(json::JsonParser::new(source)),
        Format::Bson => Box::new(bson::BsonParser::new(source)),
        Format::Bcon => Box::new(bcon::BconParser::new(source)),
    }
}

/// Writes `value` to `sink` in `format`.
///
/// For JSON, `flags` is decoded with [`JsonOptions::from_flags`]: bit
/// [`FORMAT_JSON_COMPACT`] selects compact separators and the bits in
/// [`JSON_INDENT_MASK`] hold the indentation step. Binary formats ignore
/// `flags`.
///
/// # Errors
///
/// Returns [`Error::InvalidRoot`] when a JSON or BSON root is not a list or
/// a map, and the codec's error when a value cannot be encoded.
pub fn serialize<W: Write>(sink: W, value: &Variant, format: Format, flags: u32) -> Result<()> {
    match format {
        Format::Json => json::to_writer(sink, value, &JsonOptions::from_flags(flags)),
        Format::Bson => bson::to_writer(sink, value),
        Format::Bcon => bcon::to_writer(sink, value),
    }
}

/// Serialize any `T: Serialize` to a single-line JSON string.
///
/// # Errors
///
/// Returns an error if `T` does not serialize to a map or a list.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_json_string_with_options(value, &JsonOptions::default())
}

/// Serialize any `T: Serialize` to an indented JSON string.
///
/// # Errors
///
/// Returns an error if `T` does not serialize to a map or a list.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_json_string_with_options(value, &JsonOptions::pretty())
}

/// Serialize any `T: Serialize` to a JSON string with custom options.
///
/// # Examples
///
/// ```rust
/// use variant_codec::{to_json_string_with_options, JsonOptions};
///
/// let text = to_json_string_with_options(&vec![1, 2], &JsonOptions::new().with_compact(true)).unwrap();
/// assert_eq!(text, "[1,2]");
/// ```
///
/// # Errors
///
/// Returns an error if `T` does not serialize to a map or a list.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_string_with_options<T>(value: &T, options: &JsonOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    json::to_string(&to_variant(value)?, options)
}

/// Deserialize an instance of type `T` from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not a JSON object or array, or if it
/// does not match the shape of `T`.
pub fn from_json_str<T: DeserializeOwned>(s: &str) -> Result<T> {
    from_variant(json::from_str(s)?)
}

/// Deserialize an instance of type `T` from JSON bytes.
///
/// # Errors
///
/// See [`from_json_str`].
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    from_variant(json::from_slice(bytes)?)
}

/// Deserialize an instance of type `T` from a reader of JSON text.
///
/// # Errors
///
/// See [`from_json_str`]; read failures surface as [`Error::Io`].
pub fn from_json_reader<R: std::io::Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    from_variant(json::from_reader(reader)?)
}

/// Serialize any `T: Serialize` to a BSON document.
///
/// # Errors
///
/// Returns an error if `T` does not serialize to a map or a list.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bson_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    bson::to_vec(&to_variant(value)?)
}

/// Deserialize an instance of type `T` from one BSON document.
///
/// # Errors
///
/// Returns a decoding error for malformed bytes, or a mismatch error if the
/// document does not match the shape of `T`.
pub fn from_bson_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    from_variant(bson::from_slice(bytes)?)
}

/// Serialize any `T: Serialize` to BCON bytes.
///
/// # Examples
///
/// ```rust
/// use variant_codec::{from_bcon_slice, to_bcon_vec};
///
/// let bytes = to_bcon_vec(&(1u8, "x".to_string())).unwrap();
/// let back: (u8, String) = from_bcon_slice(&bytes).unwrap();
/// assert_eq!(back, (1, "x".to_string()));
/// ```
///
/// # Errors
///
/// Returns [`Error::ValueTooLarge`] for strings or byte arrays of 2^28 bytes
/// or more.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bcon_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    bcon::to_vec(&to_variant(value)?)
}

/// Deserialize an instance of type `T` from one BCON value.
///
/// # Errors
///
/// Returns a decoding error for malformed bytes, or a mismatch error if the
/// value does not match the shape of `T`.
pub fn from_bcon_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    from_variant(bcon::from_slice(bytes)?)
}
