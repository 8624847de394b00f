//! BSON binary codec.
//!
//! Documents are little-endian and length-prefixed: an `int32` total size,
//! a run of elements, and a trailing `0x00`. Each element is a type byte, a
//! NUL-terminated key and a payload. Lists are documents whose keys are the
//! decimal indices `"0"`, `"1"`, ...
//!
//! | tag    | payload                       | variant      |
//! |--------|-------------------------------|--------------|
//! | `0x01` | IEEE-754 double               | `Double`     |
//! | `0x02` | `int32` length + UTF-8 + NUL  | `String`     |
//! | `0x03` | embedded document             | `Map`        |
//! | `0x04` | embedded document             | `List`       |
//! | `0x05` | `int32` length, subtype, data | `ByteArray`  |
//! | `0x07` | 12-byte object id             | `ByteArray`  |
//! | `0x08` | `0x00` / `0x01`               | `Bool`       |
//! | `0x09` | `int64` epoch milliseconds    | `DateTime`   |
//! | `0x0A` | none                          | `Null`       |
//! | `0x10` | `int32`                       | `Int`        |
//! | `0x12` | `int64`                       | `Long`       |
//!
//! `Byte`, `Int` and `UInt` are written as `int32`; `Long` and `ULong` as
//! `int64`. Unsigned values keep their bit pattern, so a `UInt` above
//! `i32::MAX` reads back as a negative `Int`.
//!
//! The decoder also accepts the deprecated `0x06` (undefined, read as
//! `Null`) and `0x0D` (JavaScript code, read as `String`). The root of a
//! decoded stream is always a map.
//!
//! ```rust
//! use variant_codec::{bson, variant};
//!
//! let bytes = bson::to_vec(&variant!({ "hello": "world" })).unwrap();
//! assert_eq!(bytes, b"\x16\x00\x00\x00\x02hello\x00\x06\x00\x00\x00world\x00\x00");
//! assert_eq!(bson::from_slice(&bytes).unwrap(), variant!({ "hello": "world" }));
//! ```

use crate::io::{nothing_ready, ByteSource, Parser, MAX_NESTING_DEPTH};
use crate::{Error, Result, Variant, VariantList, VariantMap};
use std::io::Write;

const TAG_DOUBLE: u8 = 0x01;
const TAG_STRING: u8 = 0x02;
const TAG_DOCUMENT: u8 = 0x03;
const TAG_ARRAY: u8 = 0x04;
const TAG_BINARY: u8 = 0x05;
const TAG_UNDEFINED: u8 = 0x06;
const TAG_OBJECT_ID: u8 = 0x07;
const TAG_BOOL: u8 = 0x08;
const TAG_DATETIME: u8 = 0x09;
const TAG_NULL: u8 = 0x0A;
const TAG_JS_CODE: u8 = 0x0D;
const TAG_INT32: u8 = 0x10;
const TAG_INT64: u8 = 0x12;

const BINARY_GENERIC: u8 = 0x00;
const OBJECT_ID_LEN: usize = 12;

/// Streaming BSON decoder yielding one map per document.
///
/// Documents nested deeper than [`MAX_NESTING_DEPTH`] fail with
/// [`Error::NestingTooDeep`].
pub struct BsonParser<S> {
    source: S,
}

impl<S: ByteSource> BsonParser<S> {
    pub fn new(source: S) -> Self {
        BsonParser { source }
    }

    fn read_document(&mut self) -> Result<VariantMap> {
        let header = self.source.read_exact_vec(4)?;
        let len = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let body_len = usize::try_from(len)
            .ok()
            .and_then(|l| l.checked_sub(4))
            .filter(|l| *l >= 1)
            .ok_or_else(|| Error::invalid_document(&format!("bad document length {}", len)))?;
        let body = self.source.read_exact_vec(body_len)?;
        let mut cursor: &[u8] = &body;
        let entries = read_elements(&mut cursor, 1)?;
        if !cursor.is_empty() {
            return Err(Error::invalid_document("bytes after document terminator"));
        }
        Ok(entries.into_iter().collect())
    }
}

impl<S: ByteSource> Parser for BsonParser<S> {
    fn next(&mut self, wait: bool) -> Result<Option<Variant>> {
        if nothing_ready(&mut self.source, wait)? {
            return Ok(None);
        }
        let map = self.read_document()?;
        tracing::trace!(entries = map.len(), "decoded BSON document");
        Ok(Some(Variant::Map(map)))
    }
}

fn take<'a>(cur: &mut &'a [u8], n: usize) -> Result<&'a [u8]> {
    if cur.len() < n {
        return Err(Error::unexpected_eof(&format!("{} more bytes", n - cur.len())));
    }
    let (head, rest) = cur.split_at(n);
    *cur = rest;
    Ok(head)
}

fn take_array<const N: usize>(cur: &mut &[u8]) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    buf.copy_from_slice(take(cur, N)?);
    Ok(buf)
}

fn read_len(cur: &mut &[u8], min: i32) -> Result<usize> {
    let len = i32::from_le_bytes(take_array(cur)?);
    if len < min {
        return Err(Error::invalid_document(&format!("negative or short length {}", len)));
    }
    // non-negative after the check above
    Ok(len as usize)
}

fn read_cstring(cur: &mut &[u8]) -> Result<String> {
    let end = cur
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::unexpected_eof("key terminator"))?;
    let key = take(cur, end)?.to_vec();
    *cur = &cur[1..];
    Ok(String::from_utf8(key)?)
}

fn read_string(cur: &mut &[u8]) -> Result<String> {
    let len = read_len(cur, 1)?;
    let bytes = take(cur, len)?;
    match bytes.split_last() {
        Some((0, text)) => Ok(String::from_utf8(text.to_vec())?),
        _ => Err(Error::invalid_document("string is not NUL-terminated")),
    }
}

/// Reads the elements of a document nested `depth` levels deep.
fn read_elements(cur: &mut &[u8], depth: usize) -> Result<Vec<(String, Variant)>> {
    let mut entries = Vec::new();
    loop {
        let tag = take_array::<1>(cur)?[0];
        if tag == 0 {
            return Ok(entries);
        }
        let key = read_cstring(cur)?;
        let value = read_element(cur, tag, depth)?;
        entries.push((key, value));
    }
}

fn read_embedded(cur: &mut &[u8], depth: usize) -> Result<Vec<(String, Variant)>> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::NestingTooDeep(MAX_NESTING_DEPTH));
    }
    let len = read_len(cur, 5)?;
    let mut body = take(cur, len - 4)?;
    let entries = read_elements(&mut body, depth + 1)?;
    if !body.is_empty() {
        return Err(Error::invalid_document("bytes after embedded document terminator"));
    }
    Ok(entries)
}

fn read_element(cur: &mut &[u8], tag: u8, depth: usize) -> Result<Variant> {
    Ok(match tag {
        TAG_DOUBLE => Variant::Double(f64::from_le_bytes(take_array(cur)?)),
        TAG_STRING | TAG_JS_CODE => Variant::String(read_string(cur)?),
        TAG_DOCUMENT => Variant::Map(read_embedded(cur, depth)?.into_iter().collect()),
        TAG_ARRAY => {
            let mut indexed = read_embedded(cur, depth)?
                .into_iter()
                .map(|(key, value)| match key.parse::<usize>() {
                    Ok(index) => Ok((index, value)),
                    Err(_) => Err(Error::invalid_document(&format!(
                        "array key {:?} is not an index",
                        key
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            indexed.sort_by_key(|(index, _)| *index);
            Variant::List(indexed.into_iter().map(|(_, v)| v).collect())
        }
        TAG_BINARY => {
            let len = read_len(cur, 0)?;
            let _subtype = take_array::<1>(cur)?;
            Variant::ByteArray(take(cur, len)?.to_vec())
        }
        TAG_UNDEFINED | TAG_NULL => Variant::Null,
        TAG_OBJECT_ID => Variant::ByteArray(take(cur, OBJECT_ID_LEN)?.to_vec()),
        TAG_BOOL => Variant::Bool(take_array::<1>(cur)?[0] != 0),
        TAG_DATETIME => Variant::DateTime(i64::from_le_bytes(take_array(cur)?)),
        TAG_INT32 => Variant::Int(i32::from_le_bytes(take_array(cur)?)),
        TAG_INT64 => Variant::Long(i64::from_le_bytes(take_array(cur)?)),
        other => {
            tracing::debug!(tag = other, "unsupported BSON element type");
            return Err(Error::UnsupportedToken(other));
        }
    })
}

fn write_i32_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = i32::try_from(len).map_err(|_| Error::ValueTooLarge(len as u64))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn write_cstring(out: &mut Vec<u8>, key: &str) -> Result<()> {
    if key.as_bytes().contains(&0) {
        return Err(Error::invalid_document(&format!("key {:?} contains NUL", key)));
    }
    out.extend_from_slice(key.as_bytes());
    out.push(0);
    Ok(())
}

fn write_document<'a, I>(out: &mut Vec<u8>, entries: I) -> Result<()>
where
    I: IntoIterator<Item = (std::borrow::Cow<'a, str>, &'a Variant)>,
{
    let start = out.len();
    out.extend_from_slice(&[0; 4]);
    for (key, value) in entries {
        write_element(out, &key, value)?;
    }
    out.push(0);
    let len = out.len() - start;
    let len = i32::try_from(len).map_err(|_| Error::ValueTooLarge(len as u64))?;
    out[start..start + 4].copy_from_slice(&len.to_le_bytes());
    Ok(())
}

fn list_entries(list: &VariantList) -> impl Iterator<Item = (std::borrow::Cow<'_, str>, &Variant)> {
    list.iter()
        .enumerate()
        .map(|(i, v)| (std::borrow::Cow::Owned(i.to_string()), v))
}

fn map_entries(map: &VariantMap) -> impl Iterator<Item = (std::borrow::Cow<'_, str>, &Variant)> {
    map.iter()
        .map(|(k, v)| (std::borrow::Cow::Borrowed(k.as_str()), v))
}

fn write_element(out: &mut Vec<u8>, key: &str, value: &Variant) -> Result<()> {
    let tag = match value {
        Variant::Null => TAG_NULL,
        Variant::Bool(_) => TAG_BOOL,
        Variant::Byte(_) | Variant::Int(_) | Variant::UInt(_) => TAG_INT32,
        Variant::Long(_) | Variant::ULong(_) => TAG_INT64,
        Variant::Double(_) => TAG_DOUBLE,
        Variant::String(_) => TAG_STRING,
        Variant::ByteArray(_) => TAG_BINARY,
        Variant::DateTime(_) => TAG_DATETIME,
        Variant::List(_) => TAG_ARRAY,
        Variant::Map(_) => TAG_DOCUMENT,
    };
    out.push(tag);
    write_cstring(out, key)?;
    match value {
        Variant::Null => {}
        Variant::Bool(b) => out.push(u8::from(*b)),
        Variant::Byte(v) => out.extend_from_slice(&i32::from(*v).to_le_bytes()),
        Variant::Int(v) => out.extend_from_slice(&v.to_le_bytes()),
        // same bits; values above i32::MAX read back as negative ints
        Variant::UInt(v) => out.extend_from_slice(&(*v as i32).to_le_bytes()),
        Variant::Long(v) | Variant::DateTime(v) => out.extend_from_slice(&v.to_le_bytes()),
        // same bits; values above i64::MAX read back as negative longs
        Variant::ULong(v) => out.extend_from_slice(&(*v as i64).to_le_bytes()),
        Variant::Double(v) => out.extend_from_slice(&v.to_le_bytes()),
        Variant::String(s) => {
            write_i32_len(out, s.len() + 1)?;
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        Variant::ByteArray(bytes) => {
            write_i32_len(out, bytes.len())?;
            out.push(BINARY_GENERIC);
            out.extend_from_slice(bytes);
        }
        Variant::List(list) => write_document(out, list_entries(list))?,
        Variant::Map(map) => write_document(out, map_entries(map))?,
    }
    Ok(())
}

/// Encodes a map (or a list, as an index-keyed document) to BSON bytes.
pub fn to_vec(value: &Variant) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match value {
        Variant::Map(map) => write_document(&mut out, map_entries(map))?,
        Variant::List(list) => write_document(&mut out, list_entries(list))?,
        other => {
            return Err(Error::invalid_root(&format!(
                "a BSON document must be a map or a list, found {}",
                other.kind()
            )))
        }
    }
    Ok(out)
}

/// Encodes `value` and writes the whole document to `writer`.
pub fn to_writer<W: Write>(mut writer: W, value: &Variant) -> Result<()> {
    let bytes = to_vec(value)?;
    writer.write_all(&bytes)?;
    tracing::trace!(bytes = bytes.len(), "serialized BSON document");
    Ok(())
}

/// Decodes exactly one BSON document.
pub fn from_slice(bytes: &[u8]) -> Result<Variant> {
    let mut parser = BsonParser::new(bytes);
    let value = parser
        .next(true)?
        .ok_or_else(|| Error::unexpected_eof("a BSON document"))?;
    if !parser.source.is_empty() {
        return Err(Error::invalid_document("trailing bytes after document"));
    }
    Ok(value)
}
