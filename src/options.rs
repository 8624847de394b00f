//! Configuration options for JSON output and variant cloning.
//!
//! - [`JsonOptions`]: compact mode and indentation step for the JSON writer
//! - [`CloneOptions`]: shallow/deep copy and read-only freezing for [`Variant::clone_with`]
//!
//! ## Examples
//!
//! ```rust
//! use variant_codec::{json, variant, JsonOptions};
//!
//! let value = variant!({ "a": 1 });
//!
//! let compact = json::to_string(&value, &JsonOptions::new().with_compact(true)).unwrap();
//! assert_eq!(compact, r#"{"a":1}"#);
//!
//! let pretty = json::to_string(&value, &JsonOptions::pretty()).unwrap();
//! assert_eq!(pretty, "{\n  \"a\": 1\n}");
//! ```
//!
//! [`Variant::clone_with`]: crate::Variant::clone_with

/// Flag bit selecting compact JSON output.
pub const FORMAT_JSON_COMPACT: u32 = 0x0000_0020;

/// Mask of the indentation step held in the low bits of a JSON flag word.
pub const JSON_INDENT_MASK: u32 = 0x0000_001F;

/// Configuration options for JSON serialization.
///
/// When `indent` is non-zero every container element goes on its own line,
/// indented by `indent` spaces per nesting level. When `compact` is set the
/// space after `:` and `,` is omitted.
///
/// # Examples
///
/// ```rust
/// use variant_codec::JsonOptions;
///
/// let options = JsonOptions::from_flags(0x22);
/// assert!(options.compact);
/// assert_eq!(options.indent, 2);
/// assert_eq!(options.to_flags(), 0x22);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonOptions {
    pub compact: bool,
    pub indent: u32,
}

impl JsonOptions {
    /// Creates default options (single line, a space after separators).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for indented output with a 2-space step.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::JsonOptions;
    ///
    /// assert_eq!(JsonOptions::pretty().indent, 2);
    /// ```
    #[must_use]
    pub fn pretty() -> Self {
        JsonOptions {
            indent: 2,
            ..Default::default()
        }
    }

    /// Decodes a packed flag word: bit 5 is compact, bits 0-4 the indent step.
    #[must_use]
    pub fn from_flags(flags: u32) -> Self {
        JsonOptions {
            compact: flags & FORMAT_JSON_COMPACT != 0,
            indent: flags & JSON_INDENT_MASK,
        }
    }

    /// Packs these options back into a flag word.
    #[must_use]
    pub fn to_flags(&self) -> u32 {
        let compact = if self.compact { FORMAT_JSON_COMPACT } else { 0 };
        compact | (self.indent & JSON_INDENT_MASK)
    }

    /// Sets the indentation step. Values above 31 are clamped.
    #[must_use]
    pub fn with_indent(mut self, indent: u32) -> Self {
        self.indent = indent.min(JSON_INDENT_MASK);
        self
    }

    /// Enables or disables compact separators.
    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

/// Options for [`Variant::clone_with`](crate::Variant::clone_with).
///
/// A shallow copy duplicates the top-level container and keeps children as
/// they are; a deep copy rebuilds every nested container. `read_only` freezes
/// the copied top-level container, and every nested container too when the
/// copy is deep.
///
/// # Examples
///
/// ```rust
/// use variant_codec::CloneOptions;
///
/// let options = CloneOptions::deep().read_only();
/// assert!(options.deep && options.read_only);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloneOptions {
    pub deep: bool,
    pub read_only: bool,
}

impl CloneOptions {
    #[must_use]
    pub fn shallow() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn deep() -> Self {
        CloneOptions {
            deep: true,
            read_only: false,
        }
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_round_trip() {
        let options = JsonOptions::new().with_compact(true).with_indent(4);
        assert_eq!(options.to_flags(), FORMAT_JSON_COMPACT | 4);
        assert_eq!(JsonOptions::from_flags(options.to_flags()), options);
    }

    #[test]
    fn test_indent_is_clamped() {
        assert_eq!(JsonOptions::new().with_indent(100).indent, 31);
    }

    #[test]
    fn test_high_bits_ignored() {
        let options = JsonOptions::from_flags(0x0004_0003);
        assert_eq!(options.indent, 3);
        assert!(!options.compact);
    }
}
