//! # Recursive-Descent Parser
//!
//! Consumes the token stream and builds the untyped [`JsonValue`] graph,
//! one grammar production per function. The [`Decoder`] owns its lexer for
//! the duration of one parse call; the typed decode surface is layered on
//! top of the same token plumbing in [`crate::reader::typed`].
use std::io::Read;

use crate::bind::BindingRegistry;
use crate::config::JsonConfig;
use crate::error::JsonError;
use crate::tokenizer::{Lexer, Token, TokenKind};
use crate::value::{JsonValue, Number, ObjectMap};

/// A one-shot JSON decoder over an incrementally-read source.
///
/// Not safe for concurrent reuse; construct one per parse call (the
/// [`crate::Json`] codec does this internally).
pub struct Decoder<'de> {
    lexer: Lexer<'de>,
    pub(crate) config: &'de JsonConfig,
    pub(crate) registry: &'de BindingRegistry,
    peeked: Option<Token>,
}

impl<'de> Decoder<'de> {
    /// Create a decoder over the given source. The source is borrowed for
    /// the duration of the parse and is never closed by the decoder.
    pub fn new(
        source: impl Read + 'de,
        config: &'de JsonConfig,
        registry: &'de BindingRegistry,
    ) -> Self {
        Self {
            lexer: Lexer::new(source, config.allow_nan_and_infinity),
            config,
            registry,
            peeked: None,
        }
    }

    /// Create a decoder over an in-memory string.
    pub fn from_str(
        text: &'de str,
        config: &'de JsonConfig,
        registry: &'de BindingRegistry,
    ) -> Self {
        Self::new(text.as_bytes(), config, registry)
    }

    /// Consume and return the next token.
    pub(crate) fn next(&mut self) -> Result<Token, JsonError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    /// Look at the next token without consuming it.
    pub(crate) fn peek(&mut self) -> Result<&Token, JsonError> {
        if self.peeked.is_none() {
            let token = self.lexer.next_token()?;
            self.peeked = Some(token);
        }
        Ok(self.peeked.as_ref().expect("peek slot just filled"))
    }

    /// Parse a single JSON value.
    pub fn read_value(&mut self) -> Result<JsonValue, JsonError> {
        let token = self.next()?;
        self.value_from(token)
    }

    /// Assert that only whitespace remains after the root value.
    pub fn expect_end(&mut self) -> Result<(), JsonError> {
        let token = self.next()?;
        if token.kind == TokenKind::End {
            Ok(())
        } else {
            Err(JsonError::structural(
                format!("unexpected trailing {}", token.kind),
                token.offset,
            ))
        }
    }

    /// Dispatch on an already-consumed token; value → object | array |
    /// string | number | literal.
    fn value_from(&mut self, token: Token) -> Result<JsonValue, JsonError> {
        match token.kind {
            TokenKind::Null => Ok(JsonValue::Null),
            TokenKind::True => Ok(JsonValue::Bool(true)),
            TokenKind::False => Ok(JsonValue::Bool(false)),
            TokenKind::NaN => {
                Ok(JsonValue::Number(Number::from_literal("NaN")))
            }
            TokenKind::PositiveInfinity => {
                Ok(JsonValue::Number(Number::from_literal("Infinity")))
            }
            TokenKind::NegativeInfinity => {
                Ok(JsonValue::Number(Number::from_literal("-Infinity")))
            }
            TokenKind::Number(text) => {
                Ok(JsonValue::Number(Number::from_literal(text)))
            }
            TokenKind::String(text) => Ok(JsonValue::String(text)),
            TokenKind::ArrayStart => self.read_array_items(),
            TokenKind::ObjectStart => self.read_object_members(),
            kind => Err(JsonError::structural(
                format!("expected a value, found {kind}"),
                token.offset,
            )),
        }
    }

    /// Array production; the `[` has already been consumed.
    fn read_array_items(&mut self) -> Result<JsonValue, JsonError> {
        let mut items = Vec::new();

        if self.peek()?.kind == TokenKind::ArrayEnd {
            self.next()?;
            return Ok(JsonValue::Array(items));
        }

        loop {
            let token = self.next()?;
            if token.kind == TokenKind::End {
                return Err(JsonError::structural(
                    "unterminated array",
                    token.offset,
                ));
            }
            items.push(self.value_from(token)?);

            let sep = self.next()?;
            match sep.kind {
                TokenKind::ValueDelim => {}
                TokenKind::ArrayEnd => break,
                TokenKind::End => {
                    return Err(JsonError::structural(
                        "unterminated array",
                        sep.offset,
                    ));
                }
                kind => {
                    return Err(JsonError::structural(
                        format!("expected ',' or ']', found {kind}"),
                        sep.offset,
                    ));
                }
            }
        }

        Ok(JsonValue::Array(items))
    }

    /// Object production; the `{` has already been consumed. Duplicate keys
    /// resolve last-write-wins.
    fn read_object_members(&mut self) -> Result<JsonValue, JsonError> {
        let mut members = ObjectMap::new();

        if self.peek()?.kind == TokenKind::ObjectEnd {
            self.next()?;
            return Ok(JsonValue::Object(members));
        }

        loop {
            let name = self.read_member_name()?;
            let value = self.read_value()?;
            members.insert(name, value);

            let sep = self.next()?;
            match sep.kind {
                TokenKind::ValueDelim => {}
                TokenKind::ObjectEnd => break,
                TokenKind::End => {
                    return Err(JsonError::structural(
                        "unterminated object",
                        sep.offset,
                    ));
                }
                kind => {
                    return Err(JsonError::structural(
                        format!("expected ',' or '}}', found {kind}"),
                        sep.offset,
                    ));
                }
            }
        }

        Ok(JsonValue::Object(members))
    }

    /// Read one `"name":` prefix of an object member.
    pub(crate) fn read_member_name(&mut self) -> Result<String, JsonError> {
        let token = self.next()?;
        let name = match token.kind {
            TokenKind::String(name) => name,
            TokenKind::End => {
                return Err(JsonError::structural(
                    "unterminated object",
                    token.offset,
                ));
            }
            kind => {
                return Err(JsonError::structural(
                    format!("expected property name, found {kind}"),
                    token.offset,
                ));
            }
        };

        let colon = self.next()?;
        if colon.kind != TokenKind::NameDelim {
            return Err(JsonError::structural(
                format!("expected ':' after property name, found {}", colon.kind),
                colon.offset,
            ));
        }
        Ok(name)
    }

    /// Consume one balanced value without materializing it. Used to ignore
    /// unknown wire names during typed decode.
    pub(crate) fn skip_value(&mut self) -> Result<(), JsonError> {
        let token = self.next()?;
        let mut depth = match token.kind {
            TokenKind::Null
            | TokenKind::True
            | TokenKind::False
            | TokenKind::NaN
            | TokenKind::PositiveInfinity
            | TokenKind::NegativeInfinity
            | TokenKind::Number(_)
            | TokenKind::String(_) => return Ok(()),
            TokenKind::ArrayStart | TokenKind::ObjectStart => 1_usize,
            kind => {
                return Err(JsonError::structural(
                    format!("expected a value, found {kind}"),
                    token.offset,
                ));
            }
        };

        while depth > 0 {
            let token = self.next()?;
            match token.kind {
                TokenKind::ArrayStart | TokenKind::ObjectStart => depth += 1,
                TokenKind::ArrayEnd | TokenKind::ObjectEnd => depth -= 1,
                TokenKind::End => {
                    return Err(JsonError::structural(
                        "unterminated value",
                        token.offset,
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
