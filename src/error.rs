//! # Error Types
//!
//! All decode/encode failures surface as a single [`JsonError`] enum. Every
//! parse-time variant carries the byte offset of the failing token so that
//! callers can translate it to a 1-based line/column with [`line_col`] using
//! the original source text. The core itself never formats line/column; it
//! only reports raw offsets.
use std::error::Error;
use std::fmt;
use std::io;

/// Represents errors that can occur while reading or writing JSON.
#[derive(Debug)]
pub enum JsonError {
    /// An unrecognized character or malformed literal at a specific offset.
    Lexical {
        /// Description of the lexical failure.
        message: String,
        /// Byte offset into the source where the failure occurred.
        offset: usize,
    },
    /// A token appeared where the grammar disallows it (misplaced comma,
    /// missing colon, unterminated array/object, trailing input).
    Structural {
        /// Description of the structural failure.
        message: String,
        /// Byte offset of the offending token.
        offset: usize,
    },
    /// A JSON value could not be converted to the statically expected target
    /// (numeric overflow, unknown enum name, null into a non-nullable slot).
    TypeCoercion {
        /// Description of the failed coercion.
        message: String,
        /// Byte offset of the value that failed to coerce.
        offset: usize,
    },
    /// A type-hint property named a type with no registered constructor.
    UnknownTypeHint {
        /// The hint value as it appeared on the wire.
        hint: String,
        /// Byte offset of the hint value.
        offset: usize,
    },
    /// Invalid binding metadata, e.g. duplicate wire names within one type.
    /// Raised eagerly when the type is first bound.
    Configuration {
        /// Description of the misconfiguration.
        message: String,
    },
    /// An underlying stream read or write failed.
    Io(io::Error),
}

impl JsonError {
    pub(crate) fn lexical(message: impl Into<String>, offset: usize) -> Self {
        Self::Lexical {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn structural(
        message: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::Structural {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn coercion(message: impl Into<String>, offset: usize) -> Self {
        Self::TypeCoercion {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Byte offset into the source text at which the failure occurred, if the
    /// failure is tied to a position in the input.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Lexical { offset, .. }
            | Self::Structural { offset, .. }
            | Self::TypeCoercion { offset, .. }
            | Self::UnknownTypeHint { offset, .. } => Some(*offset),
            Self::Configuration { .. } | Self::Io(_) => None,
        }
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical { message, offset } => {
                write!(f, "lexical error at offset {offset}: {message}")
            }
            Self::Structural { message, offset } => {
                write!(f, "structural error at offset {offset}: {message}")
            }
            Self::TypeCoercion { message, offset } => {
                write!(f, "type coercion error at offset {offset}: {message}")
            }
            Self::UnknownTypeHint { hint, offset } => {
                write!(f, "unknown type hint {hint:?} at offset {offset}")
            }
            Self::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl Error for JsonError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for JsonError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Translate a byte offset into a 1-based (line, column) pair by scanning the
/// original source text for newlines up to the offset. O(n) on demand.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut col = 1;
    for byte in &source.as_bytes()[..offset] {
        if *byte == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
