//! BCON, a compact binary encoding of variants.
//!
//! Every value starts with one leading byte. Fixed-width kinds use a tag
//! from `0x00`-`0x0D` followed by a little-endian payload. Strings and byte
//! arrays ("blobs") pack their length into the leading byte and up to three
//! extra bytes:
//!
//! | leading byte             | extra length bytes | max length   |
//! |--------------------------|--------------------|--------------|
//! | `0x80 \| S \| len`       | 0                  | 63           |
//! | `0x10 \| S \| len & 0xF` | 1                  | 4095         |
//! | `0x20 \| S \| len & 0xF` | 2                  | 1 048 575    |
//! | `0x30 \| S \| len & 0xF` | 3                  | 268 435 455  |
//!
//! `S` is `0x40` for strings and `0` for byte arrays. Extra bytes carry
//! `len >> 4`, `len >> 12` and `len >> 20` in that order.
//!
//! Containers are a tag, their children, and an END byte. A map child is
//! written as its value followed by the NUL-terminated key.
//!
//! ```rust
//! use variant_codec::{bcon, variant};
//!
//! let bytes = bcon::to_vec(&variant!({ "k": true })).unwrap();
//! assert_eq!(bytes, [0x0C, 0x02, b'k', 0x00, 0x00]);
//! ```

use crate::io::{nothing_ready, ByteSource, Parser, MAX_NESTING_DEPTH};
use crate::{Error, Result, Variant, VariantList, VariantMap};
use std::io::Write;

const END: u8 = 0x00;
const NULL: u8 = 0x01;
const TRUE: u8 = 0x02;
const FALSE: u8 = 0x03;
const BYTE: u8 = 0x04;
const INT32: u8 = 0x05;
const INT64: u8 = 0x06;
const UINT32: u8 = 0x07;
const UINT64: u8 = 0x08;
const DOUBLE: u8 = 0x0A;
const DATETIME: u8 = 0x0B;
const MAP: u8 = 0x0C;
const LIST: u8 = 0x0D;

const SHORT_BLOB: u8 = 0x80;
const STRING_FLAG: u8 = 0x40;
const TIER_MASK: u8 = 0x30;
const SHORT_LEN_MASK: u8 = 0x3F;
const LOW_LEN_MASK: u8 = 0x0F;

/// Length encoding chosen for a blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthTier {
    /// Length in the leading byte.
    Short,
    OneByte,
    TwoBytes,
    ThreeBytes,
}

impl LengthTier {
    /// Picks the smallest tier that holds `len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::bcon::LengthTier;
    ///
    /// assert_eq!(LengthTier::for_len(63).unwrap(), LengthTier::Short);
    /// assert_eq!(LengthTier::for_len(64).unwrap(), LengthTier::OneByte);
    /// assert!(LengthTier::for_len(1 << 28).is_err());
    /// ```
    pub fn for_len(len: usize) -> Result<Self> {
        [
            LengthTier::Short,
            LengthTier::OneByte,
            LengthTier::TwoBytes,
            LengthTier::ThreeBytes,
        ]
        .into_iter()
        .find(|tier| len <= tier.max_len())
        .ok_or(Error::ValueTooLarge(len as u64))
    }

    #[must_use]
    pub const fn extra_bytes(self) -> usize {
        match self {
            LengthTier::Short => 0,
            LengthTier::OneByte => 1,
            LengthTier::TwoBytes => 2,
            LengthTier::ThreeBytes => 3,
        }
    }

    #[must_use]
    pub const fn max_len(self) -> usize {
        match self {
            LengthTier::Short => SHORT_LEN_MASK as usize,
            tier => (1 << (4 + 8 * tier.extra_bytes())) - 1,
        }
    }
}

/// Streaming BCON decoder yielding one value per call.
///
/// Containers nested deeper than [`MAX_NESTING_DEPTH`] fail with
/// [`Error::NestingTooDeep`].
pub struct BconParser<S> {
    source: S,
    depth: usize,
}

impl<S: ByteSource> BconParser<S> {
    pub fn new(source: S) -> Self {
        BconParser { source, depth: 0 }
    }

    fn read_value(&mut self, lead: u8) -> Result<Variant> {
        if lead & SHORT_BLOB != 0 {
            let len = usize::from(lead & SHORT_LEN_MASK);
            return self.read_blob(len, lead & STRING_FLAG != 0);
        }
        if lead & TIER_MASK != 0 {
            let extra = usize::from((lead & TIER_MASK) >> 4);
            let mut len = usize::from(lead & LOW_LEN_MASK);
            for i in 0..extra {
                let b = self.source.require_byte("blob length")?;
                len |= usize::from(b) << (4 + 8 * i);
            }
            return self.read_blob(len, lead & STRING_FLAG != 0);
        }
        Ok(match lead {
            NULL => Variant::Null,
            TRUE => Variant::Bool(true),
            FALSE => Variant::Bool(false),
            BYTE => Variant::Byte(self.source.require_byte("byte payload")?),
            INT32 => Variant::Int(i32::from_le_bytes(self.read_array()?)),
            INT64 => Variant::Long(i64::from_le_bytes(self.read_array()?)),
            UINT32 => Variant::UInt(u32::from_le_bytes(self.read_array()?)),
            UINT64 => Variant::ULong(u64::from_le_bytes(self.read_array()?)),
            DOUBLE => Variant::Double(f64::from_le_bytes(self.read_array()?)),
            DATETIME => Variant::DateTime(i64::from_le_bytes(self.read_array()?)),
            MAP | LIST => self.read_container(lead)?,
            other => {
                tracing::debug!(token = other, "invalid BCON leading byte");
                return Err(Error::InvalidToken(other));
            }
        })
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.source.read_exact_vec(N)?);
        Ok(buf)
    }

    fn read_blob(&mut self, len: usize, is_string: bool) -> Result<Variant> {
        let bytes = self.source.read_exact_vec(len)?;
        if is_string {
            Ok(Variant::String(String::from_utf8(bytes)?))
        } else {
            Ok(Variant::ByteArray(bytes))
        }
    }

    fn read_key(&mut self) -> Result<String> {
        let mut key = Vec::new();
        loop {
            match self.source.require_byte("map key terminator")? {
                0 => return Ok(String::from_utf8(key)?),
                b => key.push(b),
            }
        }
    }

    fn read_container(&mut self, tag: u8) -> Result<Variant> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep(MAX_NESTING_DEPTH));
        }
        self.depth += 1;
        let value = if tag == MAP {
            self.read_map().map(Variant::Map)
        } else {
            self.read_list().map(Variant::List)
        };
        self.depth -= 1;
        value
    }

    fn read_map(&mut self) -> Result<VariantMap> {
        let mut map = VariantMap::new();
        loop {
            let lead = self.source.require_byte("map entry or END")?;
            if lead == END {
                return Ok(map);
            }
            let value = self.read_value(lead)?;
            let key = self.read_key()?;
            map.insert(key, value)?;
        }
    }

    fn read_list(&mut self) -> Result<VariantList> {
        let mut list = VariantList::new();
        loop {
            let lead = self.source.require_byte("list element or END")?;
            if lead == END {
                return Ok(list);
            }
            let value = self.read_value(lead)?;
            list.push(value)?;
        }
    }
}

impl<S: ByteSource> Parser for BconParser<S> {
    fn next(&mut self, wait: bool) -> Result<Option<Variant>> {
        if nothing_ready(&mut self.source, wait)? {
            return Ok(None);
        }
        self.depth = 0;
        let lead = self.source.require_byte("a BCON value")?;
        if lead == END {
            return Err(Error::InvalidToken(END));
        }
        let value = self.read_value(lead)?;
        tracing::trace!(kind = %value.kind(), "decoded BCON value");
        Ok(Some(value))
    }
}

/// Writes the leading byte and extra length bytes for a blob of `len` bytes.
fn write_blob_header(out: &mut Vec<u8>, len: usize, is_string: bool) -> Result<()> {
    let flag = if is_string { STRING_FLAG } else { 0 };
    match LengthTier::for_len(len)? {
        LengthTier::Short => out.push(SHORT_BLOB | flag | len as u8),
        tier => {
            let extra = tier.extra_bytes();
            out.push(((extra as u8) << 4) | flag | (len as u8 & LOW_LEN_MASK));
            for i in 0..extra {
                out.push((len >> (4 + 8 * i)) as u8);
            }
        }
    }
    Ok(())
}

fn write_blob(out: &mut Vec<u8>, bytes: &[u8], is_string: bool) -> Result<()> {
    write_blob_header(out, bytes.len(), is_string)?;
    out.extend_from_slice(bytes);
    Ok(())
}

fn write_value(out: &mut Vec<u8>, value: &Variant) -> Result<()> {
    match value {
        Variant::Null => out.push(NULL),
        Variant::Bool(true) => out.push(TRUE),
        Variant::Bool(false) => out.push(FALSE),
        Variant::Byte(v) => out.extend_from_slice(&[BYTE, *v]),
        Variant::Int(v) => {
            out.push(INT32);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Variant::UInt(v) => {
            out.push(UINT32);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Variant::Long(v) => {
            out.push(INT64);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Variant::ULong(v) => {
            out.push(UINT64);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Variant::Double(v) => {
            out.push(DOUBLE);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Variant::DateTime(v) => {
            out.push(DATETIME);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Variant::String(s) => write_blob(out, s.as_bytes(), true)?,
        Variant::ByteArray(bytes) => write_blob(out, bytes, false)?,
        Variant::List(list) => {
            out.push(LIST);
            for element in list {
                write_value(out, element)?;
            }
            out.push(END);
        }
        Variant::Map(map) => {
            out.push(MAP);
            for (key, element) in map {
                if key.as_bytes().contains(&0) {
                    return Err(Error::unsupported(&format!("map key {:?} contains NUL", key)));
                }
                write_value(out, element)?;
                out.extend_from_slice(key.as_bytes());
                out.push(0);
            }
            out.push(END);
        }
    }
    Ok(())
}

/// Encodes any variant to BCON bytes.
pub fn to_vec(value: &Variant) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_value(&mut out, value)?;
    Ok(out)
}

/// Encodes `value` and writes the bytes to `writer`.
pub fn to_writer<W: Write>(mut writer: W, value: &Variant) -> Result<()> {
    let bytes = to_vec(value)?;
    writer.write_all(&bytes)?;
    tracing::trace!(bytes = bytes.len(), "serialized BCON value");
    Ok(())
}

/// Decodes exactly one BCON value.
pub fn from_slice(bytes: &[u8]) -> Result<Variant> {
    let mut parser = BconParser::new(bytes);
    let value = parser
        .next(true)?
        .ok_or_else(|| Error::unexpected_eof("a BCON value"))?;
    if !parser.source.is_empty() {
        return Err(Error::custom("trailing bytes after BCON value"));
    }
    Ok(value)
}
