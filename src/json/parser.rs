use super::lexer::{Lexer, Token};
use crate::io::{nothing_ready, ByteSource, Parser, MAX_NESTING_DEPTH};
use crate::{Error, Result, Variant, VariantList, VariantMap};

const VALUE_START: &[&str] = &["Variant", "String", "Array begin '['", "Object begin '{'"];
const ROOT_START: &[&str] = &["Object begin '{'", "Array begin '['"];

/// Streaming JSON decoder.
///
/// Each call to [`Parser::next`] reads one top-level object or array. Keys
/// repeated within an object keep the last value. Containers nested deeper
/// than [`MAX_NESTING_DEPTH`] fail with [`Error::NestingTooDeep`].
///
/// # Examples
///
/// ```rust
/// use variant_codec::{json::JsonParser, Parser};
///
/// let mut parser = JsonParser::new(&br#"{"a": 1} [true]"#[..]);
/// let first = parser.next(true).unwrap().unwrap();
/// let second = parser.next(true).unwrap().unwrap();
/// assert_eq!(first.get("a").unwrap().int_value().unwrap(), 1);
/// assert!(second.at(0).unwrap().boolean_value().unwrap());
/// ```
pub struct JsonParser<S> {
    lexer: Lexer<S>,
    depth: usize,
}

impl<S: ByteSource> JsonParser<S> {
    pub fn new(source: S) -> Self {
        JsonParser {
            lexer: Lexer::new(source),
            depth: 0,
        }
    }

    /// Checks that nothing but whitespace follows the last value.
    pub fn finish(&mut self) -> Result<()> {
        match self.lexer.next_token()? {
            Token::Eof => Ok(()),
            other => Err(self.unexpected(&other, &["End of file"])),
        }
    }

    fn unexpected(&self, tok: &Token, expected: &[&str]) -> Error {
        if *tok == Token::Eof {
            return Error::unexpected_eof(&expected.join(" or "));
        }
        let (line, col) = self.lexer.position();
        Error::syntax_expected(line, col, &format!("Unexpected {}", tok.name()), expected)
    }

    /// Parses the container opened by `tok`, tracking nesting depth.
    fn parse_container(&mut self, tok: Token) -> Result<Variant> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep(MAX_NESTING_DEPTH));
        }
        self.depth += 1;
        let value = if tok == Token::ObjectBegin {
            self.parse_object()
        } else {
            self.parse_array()
        };
        self.depth -= 1;
        value
    }

    fn parse_value(&mut self, tok: Token) -> Result<Variant> {
        match tok {
            Token::ObjectBegin | Token::ArrayBegin => self.parse_container(tok),
            Token::String(s) => Ok(Variant::String(s)),
            Token::Scalar(v) => Ok(v),
            other => Err(self.unexpected(&other, VALUE_START)),
        }
    }

    fn parse_array(&mut self) -> Result<Variant> {
        let mut list = VariantList::new();
        let mut tok = self.lexer.next_token()?;
        if tok == Token::ArrayEnd {
            return Ok(Variant::List(list));
        }
        loop {
            let value = self.parse_value(tok)?;
            list.push(value)?;
            match self.lexer.next_token()? {
                Token::ElementSep => tok = self.lexer.next_token()?,
                Token::ArrayEnd => return Ok(Variant::List(list)),
                other => {
                    return Err(
                        self.unexpected(&other, &["Array element separator", "Array end ']'"])
                    )
                }
            }
        }
    }

    fn parse_object(&mut self) -> Result<Variant> {
        let mut map = VariantMap::new();
        let mut tok = self.lexer.next_token()?;
        if tok == Token::ObjectEnd {
            return Ok(Variant::Map(map));
        }
        loop {
            let key = match tok {
                Token::String(s) => s,
                other => return Err(self.unexpected(&other, &["String"])),
            };
            match self.lexer.next_token()? {
                Token::MemberSep => {}
                other => return Err(self.unexpected(&other, &["Object member separator"])),
            }
            let next = self.lexer.next_token()?;
            let value = self.parse_value(next)?;
            map.insert(key, value)?;
            match self.lexer.next_token()? {
                Token::ElementSep => tok = self.lexer.next_token()?,
                Token::ObjectEnd => return Ok(Variant::Map(map)),
                other => {
                    return Err(
                        self.unexpected(&other, &["Array element separator", "Object end '}'"])
                    )
                }
            }
        }
    }
}

impl<S: ByteSource> Parser for JsonParser<S> {
    fn next(&mut self, wait: bool) -> Result<Option<Variant>> {
        if nothing_ready(self.lexer.source_mut(), wait)? {
            return Ok(None);
        }
        self.depth = 0;
        let value = match self.lexer.next_token()? {
            tok @ (Token::ObjectBegin | Token::ArrayBegin) => self.parse_container(tok)?,
            Token::Eof => return Err(Error::unexpected_eof(&ROOT_START.join(" or "))),
            other => {
                return Err(Error::invalid_root(&format!(
                    "a JSON document must be an object or an array, found {}",
                    other.name()
                )))
            }
        };
        tracing::trace!(kind = %value.kind(), "decoded JSON document");
        Ok(Some(value))
    }
}
