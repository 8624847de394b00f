//! Narrowest-fit integer classification.
//!
//! [`IntWidth::narrowest`] picks the smallest integer width able to hold a
//! value, trying the widths in a fixed precedence: unsigned byte, unsigned
//! short, signed short, unsigned int, signed int, unsigned long, signed long.
//! [`Variant::optimize`] maps that width to a variant kind, which lets binary
//! encoders spend as few bytes as possible on a number. Decoders never call
//! it: a decoded kind is exactly what the wire tag says.

use crate::{Error, Result, Variant};

/// Integer widths in narrowest-fit precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntWidth {
    U8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
}

impl IntWidth {
    const ORDER: [IntWidth; 7] = [
        IntWidth::U8,
        IntWidth::U16,
        IntWidth::I16,
        IntWidth::U32,
        IntWidth::I32,
        IntWidth::U64,
        IntWidth::I64,
    ];

    /// Inclusive value range of this width.
    #[must_use]
    pub const fn range(self) -> (i128, i128) {
        match self {
            IntWidth::U8 => (0, u8::MAX as i128),
            IntWidth::U16 => (0, u16::MAX as i128),
            IntWidth::I16 => (i16::MIN as i128, i16::MAX as i128),
            IntWidth::U32 => (0, u32::MAX as i128),
            IntWidth::I32 => (i32::MIN as i128, i32::MAX as i128),
            IntWidth::U64 => (0, u64::MAX as i128),
            IntWidth::I64 => (i64::MIN as i128, i64::MAX as i128),
        }
    }

    #[must_use]
    pub const fn contains(self, value: i128) -> bool {
        let (min, max) = self.range();
        value >= min && value <= max
    }

    /// Returns the first width in precedence order that holds `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::IntWidth;
    ///
    /// assert_eq!(IntWidth::narrowest(200), Some(IntWidth::U8));
    /// assert_eq!(IntWidth::narrowest(-1), Some(IntWidth::I16));
    /// assert_eq!(IntWidth::narrowest(70_000), Some(IntWidth::U32));
    /// assert_eq!(IntWidth::narrowest(i128::MAX), None);
    /// ```
    #[must_use]
    pub fn narrowest(value: i128) -> Option<IntWidth> {
        Self::ORDER.into_iter().find(|w| w.contains(value))
    }
}

impl Variant {
    /// Wraps an integer in the narrowest variant kind that holds it.
    ///
    /// There are no short kinds, so the short widths land on `UInt` and `Int`.
    /// Fails with [`Error::ValueTooLarge`] outside the 64-bit ranges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::{Kind, Variant};
    ///
    /// assert_eq!(Variant::optimize(7).unwrap().kind(), Kind::Byte);
    /// assert_eq!(Variant::optimize(-7).unwrap().kind(), Kind::Int);
    /// assert_eq!(Variant::optimize(1 << 40).unwrap().kind(), Kind::ULong);
    /// assert_eq!(Variant::optimize(-(1 << 40)).unwrap().kind(), Kind::Long);
    /// ```
    pub fn optimize(value: i128) -> Result<Variant> {
        let width = IntWidth::narrowest(value)
            .ok_or_else(|| Error::ValueTooLarge(value.unsigned_abs().min(u64::MAX as u128) as u64))?;
        // the width check guarantees every cast below is lossless
        Ok(match width {
            IntWidth::U8 => Variant::Byte(value as u8),
            IntWidth::U16 | IntWidth::U32 => Variant::UInt(value as u32),
            IntWidth::I16 | IntWidth::I32 => Variant::Int(value as i32),
            IntWidth::U64 => Variant::ULong(value as u64),
            IntWidth::I64 => Variant::Long(value as i64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    #[test]
    fn test_width_boundaries() {
        assert_eq!(IntWidth::narrowest(0), Some(IntWidth::U8));
        assert_eq!(IntWidth::narrowest(255), Some(IntWidth::U8));
        assert_eq!(IntWidth::narrowest(256), Some(IntWidth::U16));
        assert_eq!(IntWidth::narrowest(65_535), Some(IntWidth::U16));
        assert_eq!(IntWidth::narrowest(-32_768), Some(IntWidth::I16));
        assert_eq!(IntWidth::narrowest(-32_769), Some(IntWidth::I32));
        assert_eq!(IntWidth::narrowest(65_536), Some(IntWidth::U32));
        assert_eq!(IntWidth::narrowest(u32::MAX as i128 + 1), Some(IntWidth::U64));
        assert_eq!(IntWidth::narrowest(i32::MIN as i128 - 1), Some(IntWidth::I64));
        assert_eq!(IntWidth::narrowest(u64::MAX as i128), Some(IntWidth::U64));
        assert_eq!(IntWidth::narrowest(u64::MAX as i128 + 1), None);
        assert_eq!(IntWidth::narrowest(i64::MIN as i128 - 1), None);
    }

    #[test]
    fn test_optimize_kinds() {
        assert_eq!(Variant::optimize(255).unwrap(), Variant::Byte(255));
        assert_eq!(Variant::optimize(300).unwrap().kind(), Kind::UInt);
        assert_eq!(Variant::optimize(-300).unwrap().kind(), Kind::Int);
        assert_eq!(
            Variant::optimize(u64::MAX as i128).unwrap(),
            Variant::ULong(u64::MAX)
        );
        assert_eq!(
            Variant::optimize(i64::MIN as i128).unwrap(),
            Variant::Long(i64::MIN)
        );
        assert!(matches!(
            Variant::optimize(i128::MIN),
            Err(Error::ValueTooLarge(_))
        ));
    }
}
