//! # Codec Configuration
//!
//! Options recognized by the reader and writer. A [`JsonConfig`] is passed
//! into codec construction explicitly; there is no process-global
//! configuration.

/// Options governing how JSON is read and written.
#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Insert newline + one tab per nesting level after structural
    /// delimiters when writing. Compact output when false.
    pub pretty_print: bool,
    /// Reserved object property carrying a type discriminator for
    /// polymorphic decode/encode. Disabled when `None`.
    pub type_hint_name: Option<String>,
    /// Escape `<`, `>`, and `&` in string output as `\uXXXX` so the result
    /// can be embedded in HTML.
    pub html_safe: bool,
    /// Accept unquoted `NaN`/`Infinity`/`-Infinity` numeric literals on read
    /// and emit them for non-finite floats on write.
    pub allow_nan_and_infinity: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            pretty_print: false,
            type_hint_name: None,
            html_safe: false,
            allow_nan_and_infinity: true,
        }
    }
}

impl JsonConfig {
    /// Construct the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable pretty-printed output.
    #[must_use]
    pub fn pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the reserved property name used as a type-discriminator hint.
    #[must_use]
    pub fn type_hint_name(mut self, name: impl Into<String>) -> Self {
        self.type_hint_name = Some(name.into());
        self
    }

    /// Enable or disable HTML-safe string escaping.
    #[must_use]
    pub fn html_safe(mut self, html_safe: bool) -> Self {
        self.html_safe = html_safe;
        self
    }

    /// Enable or disable the `NaN`/`Infinity` numeric-literal extension.
    #[must_use]
    pub fn allow_nan_and_infinity(mut self, allow: bool) -> Self {
        self.allow_nan_and_infinity = allow;
        self
    }
}
