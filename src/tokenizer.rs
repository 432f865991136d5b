//! # Tokenizer / Lexer
//!
//! Converts an input byte source from a JSON document into a lazy,
//! forward-only token stream.
pub mod lexer;
pub mod token;

// Re-exports
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
