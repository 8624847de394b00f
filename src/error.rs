//! Error types for variant conversion and the JSON, BSON and BCON codecs.
//!
//! Every failure is local and synchronous: conversions and codecs return the
//! first error they hit and recursive calls propagate it unchanged.
//!
//! ## Error Categories
//!
//! - **Conversion errors**: [`Error::TypeMismatch`] when an accessor is not
//!   defined for a kind, [`Error::Format`] when a string does not parse as the
//!   requested number
//! - **JSON errors**: [`Error::Syntax`] with line/column and the accepted
//!   token set, [`Error::InvalidRoot`] for non-container documents
//! - **Binary errors**: [`Error::UnsupportedToken`] (BSON),
//!   [`Error::InvalidToken`] and [`Error::ValueTooLarge`] (BCON)
//! - **Stream errors**: [`Error::UnexpectedEof`], [`Error::NestingTooDeep`]
//!   and [`Error::Io`]
//!
//! ## Examples
//!
//! ```rust
//! use variant_codec::{Error, Variant};
//!
//! let err = Variant::from("abc").int_value().unwrap_err();
//! assert!(matches!(err, Error::Format { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the variant model and its codecs.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The accessor is not defined for this kind of variant
    #[error("A variant with type {found} cannot be converted to {expected}")]
    TypeMismatch { expected: String, found: String },

    /// A string variant does not hold a parsable number
    #[error("Cannot parse {value:?} as {target}")]
    Format { value: String, target: String },

    /// The JSON token stream violates the grammar
    #[error("Syntax error at line {line}, column {col}: {msg}{expected}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        expected: String,
    },

    /// A document root is not a map or a list
    #[error("Invalid root: {0}")]
    InvalidRoot(String),

    /// The stream ended in the middle of a value
    #[error("Unexpected end of input\nExpected: {expected}")]
    UnexpectedEof { expected: String },

    /// BSON element type that this decoder does not handle
    #[error("Unsupported BSON token 0x{0:02X}")]
    UnsupportedToken(u8),

    /// BCON leading byte that matches no tier and no fixed tag
    #[error("Invalid BCON token 0x{0:02X}")]
    InvalidToken(u8),

    /// BCON blob longer than the widest length tier
    #[error("Value too large for BCON encoding (length={0})")]
    ValueTooLarge(u64),

    /// Decoder input nests containers deeper than [`MAX_NESTING_DEPTH`](crate::io::MAX_NESTING_DEPTH)
    #[error("Containers nested deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Malformed BSON document framing
    #[error("Invalid BSON document: {0}")]
    InvalidDocument(String),

    /// Decoded bytes are not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(String),

    /// Operation not supported for these operands
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Mutation attempted on a read-only container
    #[error("Container is read-only")]
    ReadOnly,

    /// Map lookup on a missing key
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a type mismatch error for an accessor that is not defined for `found`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::Error;
    ///
    /// let err = Error::type_mismatch("an integer", "MAP");
    /// assert!(err.to_string().contains("MAP"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a number format error.
    pub fn format(value: &str, target: &str) -> Self {
        Error::Format {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    /// Creates a lexical syntax error at the given position.
    ///
    /// Use [`Error::syntax_expected`] when the accepted token set is known.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::Error;
    ///
    /// let err = Error::syntax(3, 7, "unterminated string");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            expected: String::new(),
        }
    }

    /// Creates a grammar error naming the tokens accepted at this point.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::Error;
    ///
    /// let err = Error::syntax_expected(1, 6, "Unexpected Object end '}'", &["String", "Number"]);
    /// assert!(err.to_string().contains("String or Number expected"));
    /// ```
    pub fn syntax_expected(line: usize, col: usize, msg: &str, expected: &[&str]) -> Self {
        let list = match expected {
            [] => String::new(),
            [only] => format!(". {} expected", only),
            [init @ .., last] => format!(". {} or {} expected", init.join(", "), last),
        };
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            expected: list,
        }
    }

    /// Creates an invalid root error.
    pub fn invalid_root(msg: &str) -> Self {
        Error::InvalidRoot(msg.to_string())
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(expected: &str) -> Self {
        Error::UnexpectedEof {
            expected: expected.to_string(),
        }
    }

    /// Creates a BSON framing error.
    pub fn invalid_document(msg: &str) -> Self {
        Error::InvalidDocument(msg.to_string())
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(msg: &str) -> Self {
        Error::Unsupported(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::unexpected_eof("more input")
        } else {
            Error::io(&err.to_string())
        }
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Utf8(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
