//! # JSON Token
//!
//! Defines the lexical tokens emitted while scanning a JSON document, each
//! tagged with the byte offset at which it began.
use std::fmt::Display;

/// A lexical token plus the byte offset of its first character.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    /// What kind of token this is, including any literal payload.
    pub kind: TokenKind,
    /// Byte offset into the input at which the token began.
    pub offset: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Represents a token value from a JSON document.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    /* Delimiters */
    /// Opening curly brace
    ObjectStart,

    /// Closing curly brace
    ObjectEnd,

    /// Opening square bracket
    ArrayStart,

    /// Closing square bracket
    ArrayEnd,

    /// Colon between a property name and its value
    NameDelim,

    /// Comma between elements or members
    ValueDelim,

    /* Values */
    /// Nil value
    Null,

    /// `true` literal
    True,

    /// `false` literal
    False,

    /// Unquoted `NaN` extension literal
    NaN,

    /// Unquoted `Infinity` extension literal
    PositiveInfinity,

    /// Unquoted `-Infinity` extension literal
    NegativeInfinity,

    /// Numeric value, literal text retained verbatim
    Number(String),

    /// String value, escapes already resolved
    String(String),

    /* Reserved */
    /// End of input; repeats forever once reached
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ObjectStart => write!(f, "'{{'"),
            Self::ObjectEnd => write!(f, "'}}'"),
            Self::ArrayStart => write!(f, "'['"),
            Self::ArrayEnd => write!(f, "']'"),
            Self::NameDelim => write!(f, "':'"),
            Self::ValueDelim => write!(f, "','"),
            Self::Null => write!(f, "null"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::NaN => write!(f, "NaN"),
            Self::PositiveInfinity => write!(f, "Infinity"),
            Self::NegativeInfinity => write!(f, "-Infinity"),
            Self::Number(text) => write!(f, "number {text}"),
            Self::String(_) => write!(f, "string"),
            Self::End => write!(f, "end of input"),
        }
    }
}
