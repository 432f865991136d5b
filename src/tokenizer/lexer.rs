//! # JSON Lexer
//!
//! Converts a raw byte source into a lazy, forward-only stream of
//! [`Token`]s. The lexer reads incrementally from any [`Read`] source with a
//! single byte of lookahead, skips inter-token whitespace, resolves string
//! escapes (including surrogate pairs), and keeps numeric literal text
//! verbatim. Once the input is exhausted every further call keeps returning
//! [`TokenKind::End`].
use std::io::Read;

use crate::error::JsonError;
use crate::tokenizer::{Token, TokenKind};

const CHUNK: usize = 8 * 1024;

/// A lexer over an incrementally-read byte source.
pub struct Lexer<'de> {
    source: Box<dyn Read + 'de>,
    buf: Vec<u8>,
    buf_pos: usize,
    /// Absolute byte offset of the next unread byte.
    offset: usize,
    source_done: bool,
    finished: bool,
    allow_non_finite: bool,
}

impl<'de> Lexer<'de> {
    /// Create a lexer over the given source. `allow_non_finite` governs the
    /// unquoted `NaN`/`Infinity`/`-Infinity` extension.
    pub fn new(source: impl Read + 'de, allow_non_finite: bool) -> Self {
        Self {
            source: Box::new(source),
            buf: Vec::new(),
            buf_pos: 0,
            offset: 0,
            source_done: false,
            finished: false,
            allow_non_finite,
        }
    }

    /// Create a lexer over an in-memory string.
    pub fn from_str(text: &'de str, allow_non_finite: bool) -> Self {
        Self::new(text.as_bytes(), allow_non_finite)
    }

    /// Refill the internal buffer from the source. Returns whether any bytes
    /// are available.
    fn fill(&mut self) -> Result<bool, JsonError> {
        if self.buf_pos < self.buf.len() {
            return Ok(true);
        }
        if self.source_done {
            return Ok(false);
        }
        self.buf.resize(CHUNK, 0);
        self.buf_pos = 0;
        let n = self.source.read(&mut self.buf)?;
        self.buf.truncate(n);
        if n == 0 {
            self.source_done = true;
        }
        Ok(n > 0)
    }

    /// Look at the next byte without consuming it.
    fn peek(&mut self) -> Result<Option<u8>, JsonError> {
        if self.fill()? {
            Ok(Some(self.buf[self.buf_pos]))
        } else {
            Ok(None)
        }
    }

    /// Consume and return the next byte.
    fn advance(&mut self) -> Result<Option<u8>, JsonError> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.buf_pos += 1;
            self.offset += 1;
        }
        Ok(byte)
    }

    /// Consume whitespace byte(s) starting from the current position.
    fn skip_whitespace(&mut self) -> Result<(), JsonError> {
        while matches!(self.peek()?, Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.advance()?;
        }
        Ok(())
    }

    /// Returns the next token in the input. After the terminal
    /// [`TokenKind::End`] has been produced, keeps returning it.
    pub fn next_token(&mut self) -> Result<Token, JsonError> {
        if self.finished {
            return Ok(Token::new(TokenKind::End, self.offset));
        }
        self.skip_whitespace()?;
        let start = self.offset;

        let Some(byte) = self.peek()? else {
            self.finished = true;
            return Ok(Token::new(TokenKind::End, start));
        };

        let kind = match byte {
            b'{' => {
                self.advance()?;
                TokenKind::ObjectStart
            }
            b'}' => {
                self.advance()?;
                TokenKind::ObjectEnd
            }
            b'[' => {
                self.advance()?;
                TokenKind::ArrayStart
            }
            b']' => {
                self.advance()?;
                TokenKind::ArrayEnd
            }
            b':' => {
                self.advance()?;
                TokenKind::NameDelim
            }
            b',' => {
                self.advance()?;
                TokenKind::ValueDelim
            }
            b'"' => self.read_string(start)?,
            b'-' | b'0'..=b'9' => self.read_number(start)?,
            c if c.is_ascii_alphabetic() => self.read_literal(start)?,
            c => {
                return Err(JsonError::lexical(
                    format!("unexpected character {:?}", c as char),
                    start,
                ));
            }
        };

        Ok(Token::new(kind, start))
    }

    /// Reads an alphabetic literal (`true`, `false`, `null`, or one of the
    /// non-finite extension literals) and returns the corresponding kind.
    fn read_literal(&mut self, start: usize) -> Result<TokenKind, JsonError> {
        let mut word = String::new();
        while let Some(b) = self.peek()? {
            if !b.is_ascii_alphabetic() {
                break;
            }
            word.push(b as char);
            self.advance()?;
        }
        match word.as_str() {
            "true" => Ok(TokenKind::True),
            "false" => Ok(TokenKind::False),
            "null" => Ok(TokenKind::Null),
            "NaN" if self.allow_non_finite => Ok(TokenKind::NaN),
            "Infinity" if self.allow_non_finite => {
                Ok(TokenKind::PositiveInfinity)
            }
            "NaN" | "Infinity" => Err(JsonError::lexical(
                format!("non-finite literal `{word}` is disabled"),
                start,
            )),
            _ => Err(JsonError::lexical(
                format!("unexpected literal `{word}`"),
                start,
            )),
        }
    }

    /// Reads a JSON number (int, frac, exp), keeping its text verbatim.
    /// `-Infinity` is routed through here via its leading minus sign.
    fn read_number(&mut self, start: usize) -> Result<TokenKind, JsonError> {
        let mut text = String::new();

        // optional leading '-'
        if self.peek()? == Some(b'-') {
            self.advance()?;
            if self.peek()? == Some(b'I') {
                return match self.read_literal(start)? {
                    TokenKind::PositiveInfinity => {
                        Ok(TokenKind::NegativeInfinity)
                    }
                    _ => Err(JsonError::lexical(
                        "unexpected literal after '-'",
                        start,
                    )),
                };
            }
            text.push('-');
        }

        // integer part
        if !self.read_digits(&mut text)? {
            return Err(JsonError::lexical(
                "malformed number: expected digits",
                start,
            ));
        }

        // fractional part
        if self.peek()? == Some(b'.') {
            self.advance()?;
            text.push('.');
            if !self.read_digits(&mut text)? {
                return Err(JsonError::lexical(
                    "malformed number: expected digits after '.'",
                    start,
                ));
            }
        }

        // exponent part
        if let Some(e @ (b'e' | b'E')) = self.peek()? {
            self.advance()?;
            text.push(e as char);
            if let Some(sign @ (b'+' | b'-')) = self.peek()? {
                self.advance()?;
                text.push(sign as char);
            }
            if !self.read_digits(&mut text)? {
                return Err(JsonError::lexical(
                    "malformed number: expected exponent digits",
                    start,
                ));
            }
        }

        Ok(TokenKind::Number(text))
    }

    /// Append a run of ASCII digits to `text`; returns whether any were read.
    fn read_digits(&mut self, text: &mut String) -> Result<bool, JsonError> {
        let mut any = false;
        while let Some(b @ b'0'..=b'9') = self.peek()? {
            text.push(b as char);
            self.advance()?;
            any = true;
        }
        Ok(any)
    }

    /// Reads a string token, resolving escape sequences. `quote` is the
    /// offset of the opening quote; an unterminated string reports the
    /// offset of the character immediately following it.
    fn read_string(&mut self, quote: usize) -> Result<TokenKind, JsonError> {
        // consume opening quote
        self.advance()?;
        let mut result = String::new();

        loop {
            match self.advance()? {
                None => {
                    return Err(JsonError::lexical(
                        "unterminated string",
                        quote + 1,
                    ));
                }
                Some(b'"') => break,
                Some(b'\\') => {
                    let ch = self.read_escape_sequence()?;
                    result.push(ch);
                }
                Some(b) if b < 0x20 => {
                    return Err(JsonError::lexical(
                        "raw control character in string",
                        quote + 1,
                    ));
                }
                Some(b) if b < 0x80 => result.push(b as char),
                Some(b) => {
                    let ch = self.read_utf8_tail(b)?;
                    result.push(ch);
                }
            }
        }

        Ok(TokenKind::String(result))
    }

    /// Finish decoding a multi-byte UTF-8 sequence whose lead byte was
    /// already consumed.
    fn read_utf8_tail(&mut self, lead: u8) -> Result<char, JsonError> {
        let invalid =
            |offset| JsonError::lexical("invalid UTF-8 in string", offset);

        let (len, mut codepoint) = if lead & 0xE0 == 0xC0 {
            (2, u32::from(lead & 0x1F))
        } else if lead & 0xF0 == 0xE0 {
            (3, u32::from(lead & 0x0F))
        } else if lead & 0xF8 == 0xF0 {
            (4, u32::from(lead & 0x07))
        } else {
            return Err(invalid(self.offset - 1));
        };

        for _ in 1..len {
            let b = self.advance()?.ok_or_else(|| invalid(self.offset))?;
            if b & 0xC0 != 0x80 {
                return Err(invalid(self.offset - 1));
            }
            codepoint = (codepoint << 6) | u32::from(b & 0x3F);
        }

        char::from_u32(codepoint).ok_or_else(|| invalid(self.offset - 1))
    }

    /// Read an escape sequence after a backslash.
    fn read_escape_sequence(&mut self) -> Result<char, JsonError> {
        let at = self.offset - 1;
        match self.advance()? {
            None => Err(JsonError::lexical("unterminated escape", at)),
            Some(b'"') => Ok('"'),
            Some(b'\\') => Ok('\\'),
            Some(b'/') => Ok('/'),
            Some(b'b') => Ok('\x08'),
            Some(b'f') => Ok('\x0C'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b't') => Ok('\t'),
            Some(b'u') => self.read_unicode_escape(at),
            Some(b) => Err(JsonError::lexical(
                format!("invalid escape sequence '\\{}'", b as char),
                at,
            )),
        }
    }

    /// Read a `\uXXXX` escape, pairing surrogates into a single scalar.
    fn read_unicode_escape(&mut self, at: usize) -> Result<char, JsonError> {
        let unit = self.read_hex4(at)?;

        if (0xD800..=0xDBFF).contains(&unit) {
            // high surrogate, must be followed by \u + low surrogate
            if self.advance()? != Some(b'\\') || self.advance()? != Some(b'u')
            {
                return Err(JsonError::lexical("unpaired surrogate", at));
            }
            let low = self.read_hex4(at)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(JsonError::lexical("unpaired surrogate", at));
            }
            let combined = 0x10000
                + ((u32::from(unit) - 0xD800) << 10)
                + (u32::from(low) - 0xDC00);
            return char::from_u32(combined)
                .ok_or_else(|| JsonError::lexical("invalid codepoint", at));
        }

        if (0xDC00..=0xDFFF).contains(&unit) {
            return Err(JsonError::lexical("unpaired surrogate", at));
        }

        char::from_u32(u32::from(unit))
            .ok_or_else(|| JsonError::lexical("invalid codepoint", at))
    }

    /// Read 4 hex digits and return the code unit.
    fn read_hex4(&mut self, at: usize) -> Result<u16, JsonError> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let b = self.advance()?.ok_or_else(|| {
                JsonError::lexical("truncated unicode escape", at)
            })?;
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => {
                    return Err(JsonError::lexical(
                        "invalid hex digit in unicode escape",
                        at,
                    ));
                }
            };
            value = (value << 4) | u16::from(digit);
        }
        Ok(value)
    }
}
