//! JSON text codec.
//!
//! Decoding goes through [`JsonParser`], a recursive-descent parser over a
//! [`ByteSource`]. Documents must be an object or an array at the root.
//! Integers are kept as `Int`, `Long` or `ULong` depending on their range;
//! anything with a fraction or exponent becomes a `Double`.
//!
//! Encoding is controlled by [`JsonOptions`]. Doubles that are not finite
//! are written as `null`; byte arrays and date-times are written as their
//! quoted display text.
//!
//! ```rust
//! use variant_codec::{json, JsonOptions};
//!
//! let value = json::from_str(r#"{"items": [1, 2.5, "three"]}"#).unwrap();
//! let text = json::to_string(&value, &JsonOptions::new()).unwrap();
//! assert_eq!(text, r#"{"items": [1, 2.5, "three"]}"#);
//! ```

mod lexer;
mod parser;
mod ser;

pub use parser::JsonParser;

use crate::io::{ByteSource, Parser};
use crate::{Error, JsonOptions, Result, Variant};
use std::io::{BufReader, Read, Write};

fn check_root(value: &Variant) -> Result<()> {
    if value.is_list() || value.is_map() {
        Ok(())
    } else {
        Err(Error::invalid_root(&format!(
            "a JSON document must be a map or a list, found {}",
            value.kind()
        )))
    }
}

/// Renders a list or map as JSON text.
pub fn to_string(value: &Variant, options: &JsonOptions) -> Result<String> {
    check_root(value)?;
    Ok(to_text(value, options))
}

/// Writes a list or map as JSON text to `writer`.
pub fn to_writer<W: Write>(mut writer: W, value: &Variant, options: &JsonOptions) -> Result<()> {
    let text = to_string(value, options)?;
    writer.write_all(text.as_bytes())?;
    tracing::trace!(bytes = text.len(), "serialized JSON document");
    Ok(())
}

/// Renders any variant, skipping the root check.
pub(crate) fn to_text(value: &Variant, options: &JsonOptions) -> String {
    let mut out = String::new();
    ser::write_value(&mut out, value, ser::Indent::new(options));
    out
}

fn parse_one<S: ByteSource>(source: S) -> Result<Variant> {
    let mut parser = JsonParser::new(source);
    let value = parser
        .next(true)?
        .ok_or_else(|| Error::unexpected_eof("a JSON document"))?;
    parser.finish()?;
    Ok(value)
}

/// Parses a single JSON document from a string.
pub fn from_str(s: &str) -> Result<Variant> {
    parse_one(s.as_bytes())
}

/// Parses a single JSON document from bytes.
pub fn from_slice(bytes: &[u8]) -> Result<Variant> {
    parse_one(bytes)
}

/// Parses a single JSON document from a reader.
pub fn from_reader<R: Read>(reader: R) -> Result<Variant> {
    parse_one(BufReader::new(reader))
}
