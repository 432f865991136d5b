//! # Writer
//!
//! Serializes values and bound structured types to any [`io::Write`] sink.
//! Output shape is controlled by the owning [`JsonConfig`]: compact (no
//! interstitial whitespace) or pretty (newline plus one tab per nesting
//! level, a space after each name colon). Escaping covers the mandatory
//! set plus optional HTML-safe escapes for embedding in markup.
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::io;

use crate::bind::{BindingRegistry, JsonBind};
use crate::config::JsonConfig;
use crate::error::JsonError;
use crate::value::{JsonValue, Number};

/// Streaming JSON writer over a borrowed sink.
pub struct JsonWriter<'a> {
    out: &'a mut dyn io::Write,
    config: &'a JsonConfig,
    registry: &'a BindingRegistry,
    depth: usize,
}

impl<'a> JsonWriter<'a> {
    pub fn new(
        out: &'a mut dyn io::Write,
        config: &'a JsonConfig,
        registry: &'a BindingRegistry,
    ) -> Self {
        Self {
            out,
            config,
            registry,
            depth: 0,
        }
    }

    /// Write one untyped value graph.
    ///
    /// # Errors
    ///
    /// [`JsonError::Io`] on sink failure, [`JsonError::TypeCoercion`] for a
    /// non-finite number while the extension is disabled.
    pub fn write_value(&mut self, value: &JsonValue) -> Result<(), JsonError> {
        match value {
            JsonValue::Null => self.raw("null"),
            JsonValue::Bool(flag) => self.raw(if *flag { "true" } else { "false" }),
            JsonValue::Number(number) => self.write_number(number),
            JsonValue::String(text) => self.write_string(text),
            JsonValue::Array(items) => {
                self.begin(b'[')?;
                let mut first = true;
                for item in items {
                    self.element(&mut first)?;
                    self.write_value(item)?;
                }
                self.end(b']', first)
            }
            JsonValue::Object(members) => {
                self.begin(b'{')?;
                let mut first = true;
                for (name, member) in members.iter() {
                    self.member_name(name, &mut first)?;
                    self.write_value(member)?;
                }
                self.end(b'}', first)
            }
        }
    }

    /// Write a bound structured type as an object. When a type-hint
    /// property is configured it is emitted as the first member so the
    /// polymorphic reader can dispatch without buffering; the remaining
    /// members follow in declaration order, honoring per-field ignore and
    /// conditional-inclusion settings.
    ///
    /// # Errors
    ///
    /// Sink and non-finite failures as for [`Self::write_value`], plus
    /// configuration errors from first-time binding construction.
    pub fn write_struct<T: JsonBind>(
        &mut self,
        value: &T,
    ) -> Result<(), JsonError> {
        let binding = self.registry.binding::<T>()?;
        self.begin(b'{')?;
        let mut first = true;
        if let Some(hint_name) = &self.config.type_hint_name {
            let hint_name = hint_name.clone();
            self.member_name(&hint_name, &mut first)?;
            self.write_string(binding.type_name())?;
        }
        for field in binding.fields() {
            if field.is_ignored() || !field.should_emit(value) {
                continue;
            }
            let Some(emit) = field.emit() else { continue };
            self.member_name(field.wire_name(), &mut first)?;
            emit(value, self)?;
        }
        self.end(b'}', first)
    }

    /// Write a string value with full escaping.
    ///
    /// # Errors
    ///
    /// [`JsonError::Io`] on sink failure.
    pub fn write_string(&mut self, text: &str) -> Result<(), JsonError> {
        self.out.write_all(b"\"")?;
        for ch in text.chars() {
            match ch {
                '"' => self.out.write_all(b"\\\"")?,
                '\\' => self.out.write_all(b"\\\\")?,
                '\n' => self.out.write_all(b"\\n")?,
                '\r' => self.out.write_all(b"\\r")?,
                '\t' => self.out.write_all(b"\\t")?,
                '\u{8}' => self.out.write_all(b"\\b")?,
                '\u{c}' => self.out.write_all(b"\\f")?,
                '<' | '>' | '&' if self.config.html_safe => {
                    write!(self.out, "\\u{:04x}", ch as u32)?;
                }
                ch if (ch as u32) < 0x20 => {
                    write!(self.out, "\\u{:04x}", ch as u32)?;
                }
                ch => {
                    let mut buf = [0u8; 4];
                    self.out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
                }
            }
        }
        self.out.write_all(b"\"")?;
        Ok(())
    }

    /// Write a number literal verbatim, gating the non-finite extension.
    fn write_number(&mut self, number: &Number) -> Result<(), JsonError> {
        let text = number.text();
        if matches!(text, "NaN" | "Infinity" | "-Infinity")
            && !self.config.allow_nan_and_infinity
        {
            return Err(JsonError::coercion(
                format!("non-finite number {text} requires allow_nan_and_infinity"),
                0,
            ));
        }
        self.raw(text)
    }

    pub(crate) fn write_f64(&mut self, value: f64) -> Result<(), JsonError> {
        if value.is_finite() {
            // Display renders the shortest text that round-trips
            write!(self.out, "{value}")?;
            return Ok(());
        }
        if !self.config.allow_nan_and_infinity {
            return Err(JsonError::coercion(
                format!("non-finite number {value} requires allow_nan_and_infinity"),
                0,
            ));
        }
        let literal = if value.is_nan() {
            "NaN"
        } else if value > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        self.raw(literal)
    }

    fn raw(&mut self, text: &str) -> Result<(), JsonError> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn begin(&mut self, open: u8) -> Result<(), JsonError> {
        self.out.write_all(&[open])?;
        self.depth += 1;
        Ok(())
    }

    fn end(&mut self, close: u8, empty: bool) -> Result<(), JsonError> {
        self.depth -= 1;
        if self.config.pretty_print && !empty {
            self.newline_indent()?;
        }
        self.out.write_all(&[close])?;
        Ok(())
    }

    /// Element separator plus pretty indentation; `first` tracks whether a
    /// comma is due.
    fn element(&mut self, first: &mut bool) -> Result<(), JsonError> {
        if !*first {
            self.out.write_all(b",")?;
        }
        *first = false;
        if self.config.pretty_print {
            self.newline_indent()?;
        }
        Ok(())
    }

    fn member_name(
        &mut self,
        name: &str,
        first: &mut bool,
    ) -> Result<(), JsonError> {
        self.element(first)?;
        self.write_string(name)?;
        self.out
            .write_all(if self.config.pretty_print { b": " } else { b":" })?;
        Ok(())
    }

    fn newline_indent(&mut self) -> Result<(), JsonError> {
        self.out.write_all(b"\n")?;
        for _ in 0..self.depth {
            self.out.write_all(b"\t")?;
        }
        Ok(())
    }
}

/// Types that can be serialized to a JSON writer. Object safe so binding
/// metadata can store plain function pointers over it.
///
/// The writer does not track visited nodes; implementations over shared
/// ownership (`Rc`/`Arc` graphs) must be acyclic or serialization will
/// recurse without bound.
pub trait ToJson {
    /// Serialize `self` at the writer's current position.
    ///
    /// # Errors
    ///
    /// [`JsonError::Io`] on sink failure, plus the writer's coercion and
    /// configuration failure modes.
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError>;
}

macro_rules! impl_to_json_int {
    ($($int:ty),* $(,)?) => {$(
        impl ToJson for $int {
            fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
                write!(w.out, "{self}")?;
                Ok(())
            }
        }
    )*};
}

impl_to_json_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl ToJson for f64 {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        w.write_f64(*self)
    }
}

impl ToJson for f32 {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        w.write_f64(f64::from(*self))
    }
}

impl ToJson for bool {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        w.raw(if *self { "true" } else { "false" })
    }
}

impl ToJson for str {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        w.write_string(self)
    }
}

impl ToJson for String {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        w.write_string(self)
    }
}

impl ToJson for char {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        let mut buf = [0u8; 4];
        w.write_string(self.encode_utf8(&mut buf))
    }
}

impl ToJson for Number {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        w.write_number(self)
    }
}

impl ToJson for JsonValue {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        w.write_value(self)
    }
}

/// `None` serializes as `null`.
impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        match self {
            Some(value) => value.to_json(w),
            None => w.raw("null"),
        }
    }
}

impl<T: ToJson + ?Sized> ToJson for Box<T> {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        (**self).to_json(w)
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        (**self).to_json(w)
    }
}

fn write_seq<'x, T: ToJson + 'x>(
    w: &mut JsonWriter<'_>,
    items: impl Iterator<Item = &'x T>,
) -> Result<(), JsonError> {
    w.begin(b'[')?;
    let mut first = true;
    for item in items {
        w.element(&mut first)?;
        item.to_json(w)?;
    }
    w.end(b']', first)
}

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        write_seq(w, self.iter())
    }
}

impl<T: ToJson, const N: usize> ToJson for [T; N] {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        write_seq(w, self.iter())
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        write_seq(w, self.iter())
    }
}

impl<T: ToJson> ToJson for VecDeque<T> {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        write_seq(w, self.iter())
    }
}

impl<T: ToJson> ToJson for HashSet<T> {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        write_seq(w, self.iter())
    }
}

impl<T: ToJson> ToJson for BTreeSet<T> {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        write_seq(w, self.iter())
    }
}

fn write_map<'x, V: ToJson + 'x>(
    w: &mut JsonWriter<'_>,
    entries: impl Iterator<Item = (&'x String, &'x V)>,
) -> Result<(), JsonError> {
    w.begin(b'{')?;
    let mut first = true;
    for (name, value) in entries {
        w.member_name(name, &mut first)?;
        value.to_json(w)?;
    }
    w.end(b'}', first)
}

impl<V: ToJson> ToJson for HashMap<String, V> {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        write_map(w, self.iter())
    }
}

impl<V: ToJson> ToJson for BTreeMap<String, V> {
    fn to_json(&self, w: &mut JsonWriter<'_>) -> Result<(), JsonError> {
        write_map(w, self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{BindingBuilder, TypeBinding};
    use crate::reader::FromJson;

    fn render(value: &impl ToJson, config: &JsonConfig) -> String {
        let registry = BindingRegistry::new();
        let mut out = Vec::new();
        let mut writer = JsonWriter::new(&mut out, config, &registry);
        value.to_json(&mut writer).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn compact(value: &impl ToJson) -> String {
        render(value, &JsonConfig::new())
    }

    #[test]
    fn scalars() {
        assert_eq!(compact(&42_i32), "42");
        assert_eq!(compact(&true), "true");
        assert_eq!(compact(&"hi".to_string()), "\"hi\"");
        assert_eq!(compact(&None::<i32>), "null");
        assert_eq!(compact(&Some(7)), "7");
    }

    #[test]
    fn floats_render_shortest_roundtrip() {
        assert_eq!(compact(&2.5_f64), "2.5");
        assert_eq!(compact(&3.0_f64), "3");
        assert_eq!(compact(&0.1_f64), "0.1");
    }

    #[test]
    fn non_finite_honors_configuration() {
        assert_eq!(compact(&f64::NAN), "NaN");
        assert_eq!(compact(&f64::NEG_INFINITY), "-Infinity");

        let strict = JsonConfig::new().allow_nan_and_infinity(false);
        let registry = BindingRegistry::new();
        let mut out = Vec::new();
        let mut writer = JsonWriter::new(&mut out, &strict, &registry);
        assert!(matches!(
            f64::INFINITY.to_json(&mut writer),
            Err(JsonError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn compact_object_is_byte_exact() {
        let value = crate::from_str(r#"{ "x": [1, 2, 3] }"#).unwrap();
        assert_eq!(compact(&value), r#"{"x":[1,2,3]}"#);
    }

    #[test]
    fn pretty_uses_tabs_and_spaced_colons() {
        let value = crate::from_str(r#"{"x":[1,2],"y":{}}"#).unwrap();
        let pretty = render(&value, &JsonConfig::new().pretty_print(true));
        assert_eq!(
            pretty,
            "{\n\t\"x\": [\n\t\t1,\n\t\t2\n\t],\n\t\"y\": {}\n}"
        );
    }

    #[test]
    fn escapes_mandatory_set() {
        assert_eq!(
            compact(&"a\"b\\c\nd\u{1}".to_string()),
            r#""a\"b\\c\nd\u0001""#
        );
    }

    #[test]
    fn html_safe_escapes_markup() {
        let unsafe_text = "<b>&".to_string();
        assert_eq!(compact(&unsafe_text), "\"<b>&\"");
        let html = render(&unsafe_text, &JsonConfig::new().html_safe(true));
        assert_eq!(html, "\"\\u003cb\\u003e\\u0026\"");
    }

    #[test]
    fn collections() {
        assert_eq!(compact(&vec![1, 2, 3]), "[1,2,3]");
        assert_eq!(compact(&Vec::<i32>::new()), "[]");
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        assert_eq!(compact(&map), r#"{"a":1,"b":2}"#);
    }

    #[derive(Debug, Default, PartialEq)]
    struct Badge {
        id: u32,
        note: Option<String>,
        secret: String,
    }

    impl JsonBind for Badge {
        fn bind() -> Result<TypeBinding<Self>, JsonError> {
            BindingBuilder::<Self>::new("badge")
                .field(
                    "id",
                    |v, d| {
                        v.id = FromJson::from_json(d)?;
                        Ok(())
                    },
                    |v, w| v.id.to_json(w),
                )
                .field_when(
                    "note",
                    |v, d| {
                        v.note = FromJson::from_json(d)?;
                        Ok(())
                    },
                    |v, w| v.note.to_json(w),
                    |v| v.note.is_some(),
                )
                .ignore("secret")
                .build()
        }
    }

    fn render_struct(value: &Badge, config: &JsonConfig) -> String {
        let registry = BindingRegistry::new();
        let mut out = Vec::new();
        let mut writer = JsonWriter::new(&mut out, config, &registry);
        writer.write_struct(value).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn struct_emission_honors_ignore_and_when() {
        let badge = Badge {
            id: 7,
            note: None,
            secret: "hidden".into(),
        };
        assert_eq!(render_struct(&badge, &JsonConfig::new()), r#"{"id":7}"#);

        let badge = Badge {
            note: Some("vip".into()),
            ..badge
        };
        assert_eq!(
            render_struct(&badge, &JsonConfig::new()),
            r#"{"id":7,"note":"vip"}"#
        );
    }

    #[test]
    fn type_hint_emitted_first() {
        let badge = Badge::default();
        let config = JsonConfig::new().type_hint_name("@type");
        assert_eq!(
            render_struct(&badge, &config),
            r#"{"@type":"badge","id":0}"#
        );
    }
}
