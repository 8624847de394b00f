use crate::io::ByteSource;
use crate::{Error, Result, Variant};

/// A JSON token. Strings are kept apart from other scalars because only
/// they may appear as object keys.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Eof,
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    MemberSep,
    ElementSep,
    String(String),
    Scalar(Variant),
}

impl Token {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Token::Eof => "End of file",
            Token::ObjectBegin => "Object begin '{'",
            Token::ObjectEnd => "Object end '}'",
            Token::ArrayBegin => "Array begin '['",
            Token::ArrayEnd => "Array end ']'",
            Token::MemberSep => "Object member separator",
            Token::ElementSep => "Array element separator",
            Token::String(_) => "String",
            Token::Scalar(_) => "Variant",
        }
    }
}

pub(crate) struct Lexer<S> {
    source: S,
    line: usize,
    col: usize,
}

impl<S: ByteSource> Lexer<S> {
    pub(crate) fn new(source: S) -> Self {
        Lexer {
            source,
            line: 1,
            col: 0,
        }
    }

    pub(crate) fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    pub(crate) fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn error(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.col, msg)
    }

    fn bump(&mut self) -> Result<Option<u8>> {
        let b = self.source.read_byte()?;
        match b {
            Some(b'\n') => {
                self.line += 1;
                self.col = 0;
            }
            Some(_) => self.col += 1,
            None => {}
        }
        Ok(b)
    }

    fn bump_in(&mut self, what: &str) -> Result<u8> {
        match self.bump()? {
            Some(b) => Ok(b),
            None => Err(self.error(&format!("Unterminated {}", what))),
        }
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(b) = self.source.peek_byte()? {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.bump()?;
        }
        Ok(())
    }

    pub(crate) fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace()?;
        let Some(b) = self.bump()? else {
            return Ok(Token::Eof);
        };
        match b {
            b'{' => Ok(Token::ObjectBegin),
            b'}' => Ok(Token::ObjectEnd),
            b'[' => Ok(Token::ArrayBegin),
            b']' => Ok(Token::ArrayEnd),
            b':' => Ok(Token::MemberSep),
            b',' => Ok(Token::ElementSep),
            b'"' => self.lex_string().map(Token::String),
            b'-' | b'0'..=b'9' => self.lex_number(b).map(Token::Scalar),
            b'a'..=b'z' => self.lex_literal(b).map(Token::Scalar),
            other => Err(self.error(&format!("Unexpected character {:?}", other as char))),
        }
    }

    fn lex_string(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        loop {
            match self.bump_in("string")? {
                b'"' => break,
                b'\\' => match self.bump_in("string")? {
                    b'"' => buf.push(b'"'),
                    b'\\' => buf.push(b'\\'),
                    b'/' => buf.push(b'/'),
                    b'b' => buf.push(0x08),
                    b'f' => buf.push(0x0C),
                    b'n' => buf.push(b'\n'),
                    b'r' => buf.push(b'\r'),
                    b't' => buf.push(b'\t'),
                    b'u' => {
                        let c = self.lex_unicode()?;
                        let mut tmp = [0u8; 4];
                        buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
                    }
                    other => {
                        return Err(self.error(&format!("Invalid escape '\\{}'", other as char)))
                    }
                },
                b => buf.push(b),
            }
        }
        Ok(String::from_utf8(buf)?)
    }

    fn hex4(&mut self) -> Result<u32> {
        let mut value = 0;
        for _ in 0..4 {
            let b = self.bump_in("unicode escape")?;
            let digit = (b as char)
                .to_digit(16)
                .ok_or_else(|| self.error("Invalid hex digit in unicode escape"))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn lex_unicode(&mut self) -> Result<char> {
        let hi = self.hex4()?;
        if (0xD800..0xDC00).contains(&hi) {
            if self.bump()? != Some(b'\\') || self.bump()? != Some(b'u') {
                return Err(self.error("Missing low surrogate"));
            }
            let lo = self.hex4()?;
            if !(0xDC00..0xE000).contains(&lo) {
                return Err(self.error("Invalid low surrogate"));
            }
            let cp = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
            return char::from_u32(cp).ok_or_else(|| self.error("Invalid surrogate pair"));
        }
        char::from_u32(hi).ok_or_else(|| self.error("Invalid unicode escape"))
    }

    fn lex_number(&mut self, first: u8) -> Result<Variant> {
        let mut text = String::new();
        text.push(first as char);
        while let Some(b) = self.source.peek_byte()? {
            if !matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E') {
                break;
            }
            self.bump()?;
            text.push(b as char);
        }

        let invalid = || self.error(&format!("Invalid number {:?}", text));
        if text.contains(['.', 'e', 'E']) {
            return text.parse::<f64>().map(Variant::Double).map_err(|_| invalid());
        }
        if let Ok(v) = text.parse::<i32>() {
            Ok(Variant::Int(v))
        } else if let Ok(v) = text.parse::<i64>() {
            Ok(Variant::Long(v))
        } else if let Ok(v) = text.parse::<u64>() {
            Ok(Variant::ULong(v))
        } else {
            // integer too wide for 64 bits; fall back to a double
            text.parse::<f64>().map(Variant::Double).map_err(|_| invalid())
        }
    }

    fn lex_literal(&mut self, first: u8) -> Result<Variant> {
        let mut word = String::new();
        word.push(first as char);
        while let Some(b) = self.source.peek_byte()? {
            if !b.is_ascii_alphanumeric() {
                break;
            }
            self.bump()?;
            word.push(b as char);
        }
        match word.as_str() {
            "true" => Ok(Variant::Bool(true)),
            "false" => Ok(Variant::Bool(false)),
            "null" => Ok(Variant::Null),
            _ => Err(self.error(&format!("Invalid literal {:?}", word))),
        }
    }
}
