/*!
# `jsonbind` Library

JSON tokenizer, recursive-descent reader, and writer with strongly typed
binding. Documents decode into the untyped [`JsonValue`] graph or directly
into caller types through [`FromJson`] and per-type binding metadata;
values and bound types serialize back through [`ToJson`]. Every parse
error carries the byte offset where it was detected.

## Quick start

```
let value = jsonbind::from_str(r#"{ "x": [1, 2, 3] }"#)?;
assert_eq!(value.to_json()?, r#"{"x":[1,2,3]}"#);

let xs: Vec<i64> = jsonbind::from_str_as("[1, 2, 3]")?;
assert_eq!(xs, vec![1, 2, 3]);
# Ok::<(), jsonbind::JsonError>(())
```
*/

pub mod bind;
pub mod commands;
pub mod config;
pub mod error;
pub mod reader;
pub mod tokenizer;
pub mod utils;
pub mod value;
pub mod writer;

use std::io::{Read, Write};
use std::sync::Arc;

pub use bind::{
    BindingBuilder, BindingRegistry, FieldBinding, JsonBind, PolyRegistry,
    TypeBinding,
};
pub use config::JsonConfig;
pub use error::{JsonError, line_col};
pub use reader::{Decoder, FromJson};
pub use value::{JsonValue, Number, ObjectMap};
pub use writer::{JsonWriter, ToJson};

/// A configured codec. Cheap to construct; decode and encode calls borrow
/// it immutably, so one instance can serve many threads.
#[derive(Clone)]
pub struct Json {
    config: JsonConfig,
    registry: Arc<BindingRegistry>,
}

impl Json {
    /// Create a codec over the process-wide binding registry.
    #[must_use]
    pub fn new(config: JsonConfig) -> Self {
        Self {
            config,
            registry: bind::global(),
        }
    }

    /// Create a codec over a private binding registry. Useful in tests and
    /// anywhere binding lifetimes should not be process-global.
    #[must_use]
    pub fn with_registry(
        config: JsonConfig,
        registry: Arc<BindingRegistry>,
    ) -> Self {
        Self { config, registry }
    }

    #[must_use]
    pub fn config(&self) -> &JsonConfig {
        &self.config
    }

    /// Parse a complete document into the untyped value graph. Trailing
    /// non-whitespace input is a structural error.
    ///
    /// # Errors
    ///
    /// Lexical and structural [`JsonError`]s with byte offsets.
    pub fn decode(&self, text: &str) -> Result<JsonValue, JsonError> {
        self.decode_from(text.as_bytes())
    }

    /// Parse a complete document from a byte stream.
    ///
    /// # Errors
    ///
    /// As [`Self::decode`], plus [`JsonError::Io`] on stream failure.
    pub fn decode_from(
        &self,
        source: impl Read,
    ) -> Result<JsonValue, JsonError> {
        let mut decoder = Decoder::new(source, &self.config, &self.registry);
        let value = decoder.read_value()?;
        decoder.expect_end()?;
        Ok(value)
    }

    /// Decode a complete document directly into a typed target.
    ///
    /// # Errors
    ///
    /// Parse errors as [`Self::decode`], plus coercion and type-hint
    /// failures from the target type.
    pub fn decode_as<T: FromJson>(&self, text: &str) -> Result<T, JsonError> {
        self.decode_from_as(text.as_bytes())
    }

    /// Decode a typed target from a byte stream.
    ///
    /// # Errors
    ///
    /// As [`Self::decode_as`], plus [`JsonError::Io`] on stream failure.
    pub fn decode_from_as<T: FromJson>(
        &self,
        source: impl Read,
    ) -> Result<T, JsonError> {
        let mut decoder = Decoder::new(source, &self.config, &self.registry);
        let value = T::from_json(&mut decoder)?;
        decoder.expect_end()?;
        Ok(value)
    }

    /// Serialize a value to a string under this codec's configuration.
    ///
    /// # Errors
    ///
    /// Non-finite numbers while `allow_nan_and_infinity` is off, plus any
    /// binding configuration failure.
    pub fn encode(
        &self,
        value: &(impl ToJson + ?Sized),
    ) -> Result<String, JsonError> {
        let mut out = Vec::new();
        self.encode_to(value, &mut out)?;
        Ok(String::from_utf8(out).expect("writer emits UTF-8"))
    }

    /// Serialize a value to any [`Write`] sink.
    ///
    /// # Errors
    ///
    /// As [`Self::encode`], plus [`JsonError::Io`] on sink failure.
    pub fn encode_to(
        &self,
        value: &(impl ToJson + ?Sized),
        out: &mut impl Write,
    ) -> Result<(), JsonError> {
        let mut writer = JsonWriter::new(out, &self.config, &self.registry);
        value.to_json(&mut writer)
    }
}

impl Default for Json {
    fn default() -> Self {
        Self::new(JsonConfig::new())
    }
}

/// Parse a document into the untyped value graph with default settings.
///
/// # Errors
///
/// Lexical and structural [`JsonError`]s with byte offsets.
pub fn from_str(text: &str) -> Result<JsonValue, JsonError> {
    Json::default().decode(text)
}

/// Decode a document into a typed target with default settings.
///
/// # Errors
///
/// Parse and coercion [`JsonError`]s with byte offsets.
pub fn from_str_as<T: FromJson>(text: &str) -> Result<T, JsonError> {
    Json::default().decode_as(text)
}

/// Serialize a value compactly with default settings.
///
/// # Errors
///
/// Serialization [`JsonError`]s, see [`Json::encode`].
pub fn to_string(value: &(impl ToJson + ?Sized)) -> Result<String, JsonError> {
    Json::default().encode(value)
}

/// Serialize a value pretty-printed with default settings.
///
/// # Errors
///
/// Serialization [`JsonError`]s, see [`Json::encode`].
pub fn to_string_pretty(
    value: &(impl ToJson + ?Sized),
) -> Result<String, JsonError> {
    Json::new(JsonConfig::new().pretty_print(true)).encode(value)
}
