//! # Reader
//!
//! Recursive-descent parsing over the token stream. [`parser`] holds the
//! decoder core and the untyped value production; [`typed`] layers the
//! [`FromJson`] coercion engine and structured/polymorphic decode on top.
pub mod parser;
pub mod typed;

pub use parser::Decoder;
pub use typed::FromJson;
