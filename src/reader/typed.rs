//! # Typed Decode
//!
//! Coerces the token stream directly into caller-supplied target types via
//! the [`FromJson`] trait. Scalars apply the minimal coercion for their
//! target; containers resolve their flavor (array, list, deque, set, map);
//! structured types go through cached binding metadata; polymorphic targets
//! dispatch on the configured type-hint property.
//!
//! There is no partial-result contract: a typed decode either fully
//! succeeds or fails with the offset of the offending token.
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

use crate::bind::{FieldBinding, JsonBind, PolyRegistry, TypeBinding};
use crate::error::JsonError;
use crate::reader::Decoder;
use crate::tokenizer::TokenKind;
use crate::value::{JsonValue, Number};

/// Types that can be decoded from a JSON token stream.
pub trait FromJson: Sized {
    /// Decode one value from the decoder's current position.
    ///
    /// # Errors
    ///
    /// Returns a [`JsonError`] carrying the offset of the failing token.
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError>;
}

/// A "found X where Y was expected" coercion error; nulls get a dedicated
/// message since null-into-non-nullable is its own failure mode.
fn mismatch(expected: &str, found: &TokenKind, offset: usize) -> JsonError {
    if *found == TokenKind::Null {
        JsonError::coercion(
            format!("null is not valid for non-nullable {expected}"),
            offset,
        )
    } else {
        JsonError::coercion(
            format!("expected {expected}, found {found}"),
            offset,
        )
    }
}

/// Parse integer text, tolerating float notation that denotes a whole
/// number; anything out of range for the target is an overflow error.
fn parse_int<T: TryFrom<i128>>(
    text: &str,
    offset: usize,
) -> Result<T, JsonError> {
    let wide: i128 = match text.parse::<i128>() {
        Ok(v) => v,
        Err(_) => {
            let f: f64 = text.parse().map_err(|_| {
                JsonError::coercion(
                    format!("number {text} is not a valid integer"),
                    offset,
                )
            })?;
            #[allow(clippy::cast_precision_loss)]
            let in_range =
                f.is_finite() && f >= i128::MIN as f64 && f <= i128::MAX as f64;
            if !in_range || f.fract() != 0.0 {
                return Err(JsonError::coercion(
                    format!("number {text} is not a valid integer"),
                    offset,
                ));
            }
            #[allow(clippy::cast_possible_truncation)]
            {
                f as i128
            }
        }
    };
    T::try_from(wide).map_err(|_| {
        JsonError::coercion(
            format!("number {text} overflows the target integer type"),
            offset,
        )
    })
}

macro_rules! impl_from_json_int {
    ($($int:ty),* $(,)?) => {$(
        impl FromJson for $int {
            fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
                let token = d.next()?;
                match token.kind {
                    TokenKind::Number(text) => parse_int(&text, token.offset),
                    kind => Err(mismatch(
                        concat!("number (", stringify!($int), ")"),
                        &kind,
                        token.offset,
                    )),
                }
            }
        }
    )*};
}

impl_from_json_int!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

impl FromJson for f64 {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let token = d.next()?;
        match token.kind {
            TokenKind::Number(text) => text.parse().map_err(|_| {
                JsonError::coercion(
                    format!("number {text} is not a valid double"),
                    token.offset,
                )
            }),
            TokenKind::NaN => Ok(Self::NAN),
            TokenKind::PositiveInfinity => Ok(Self::INFINITY),
            TokenKind::NegativeInfinity => Ok(Self::NEG_INFINITY),
            kind => Err(mismatch("number", &kind, token.offset)),
        }
    }
}

impl FromJson for f32 {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let offset = d.peek()?.offset;
        let wide = f64::from_json(d)?;
        #[allow(clippy::cast_possible_truncation)]
        let narrow = wide as Self;
        if narrow.is_infinite() && wide.is_finite() {
            return Err(JsonError::coercion(
                format!("number {wide} overflows f32"),
                offset,
            ));
        }
        Ok(narrow)
    }
}

impl FromJson for bool {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let token = d.next()?;
        match token.kind {
            TokenKind::True => Ok(true),
            TokenKind::False => Ok(false),
            kind => Err(mismatch("boolean", &kind, token.offset)),
        }
    }
}

impl FromJson for String {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let token = d.next()?;
        match token.kind {
            TokenKind::String(text) => Ok(text),
            kind => Err(mismatch("string", &kind, token.offset)),
        }
    }
}

impl FromJson for char {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let token = d.next()?;
        match token.kind {
            TokenKind::String(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(ch),
                    _ => Err(JsonError::coercion(
                        format!("expected a single-character string, found {text:?}"),
                        token.offset,
                    )),
                }
            }
            kind => Err(mismatch("string", &kind, token.offset)),
        }
    }
}

impl FromJson for Number {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let token = d.next()?;
        match token.kind {
            TokenKind::Number(text) => Ok(Self::from_literal(text)),
            TokenKind::NaN => Ok(Self::from_literal("NaN")),
            TokenKind::PositiveInfinity => Ok(Self::from_literal("Infinity")),
            TokenKind::NegativeInfinity => {
                Ok(Self::from_literal("-Infinity"))
            }
            kind => Err(mismatch("number", &kind, token.offset)),
        }
    }
}

impl FromJson for JsonValue {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        d.read_value()
    }
}

/// `null` sets absence; any other value decodes as `Some`.
impl<T: FromJson> FromJson for Option<T> {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        if d.peek()?.kind == TokenKind::Null {
            d.next()?;
            return Ok(None);
        }
        T::from_json(d).map(Some)
    }
}

impl<T: FromJson> FromJson for Box<T> {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        T::from_json(d).map(Self::new)
    }
}

/// Shared array production for every sequence flavor; returns the offset of
/// the opening bracket.
fn read_seq<T: FromJson>(
    d: &mut Decoder<'_>,
    mut push: impl FnMut(T),
) -> Result<usize, JsonError> {
    let start = d.next()?;
    if start.kind != TokenKind::ArrayStart {
        return Err(mismatch("array", &start.kind, start.offset));
    }

    if d.peek()?.kind == TokenKind::ArrayEnd {
        d.next()?;
        return Ok(start.offset);
    }

    loop {
        push(T::from_json(d)?);
        let sep = d.next()?;
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
    Ok(start.offset)
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let mut items = Self::new();
        read_seq(d, |item| items.push(item))?;
        Ok(items)
    }
}

/// Fixed-size arrays stage through a resizable buffer first; a length
/// mismatch is a coercion error.
impl<T: FromJson, const N: usize> FromJson for [T; N] {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let mut staging = Vec::with_capacity(N);
        let start = read_seq(d, |item| staging.push(item))?;
        Self::try_from(staging).map_err(|staging: Vec<T>| {
            JsonError::coercion(
                format!("expected {N} elements, found {}", staging.len()),
                start,
            )
        })
    }
}

/// Construction-from-sequence, order preserved (not reversed).
impl<T: FromJson> FromJson for VecDeque<T> {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let mut items = Self::new();
        read_seq(d, |item| items.push_back(item))?;
        Ok(items)
    }
}

/// Duplicates per the set's equality collapse silently.
impl<T: FromJson + Eq + Hash> FromJson for HashSet<T> {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let mut items = Self::new();
        read_seq(d, |item| {
            items.insert(item);
        })?;
        Ok(items)
    }
}

impl<T: FromJson + Ord> FromJson for BTreeSet<T> {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let mut items = Self::new();
        read_seq(d, |item| {
            items.insert(item);
        })?;
        Ok(items)
    }
}

/// Shared object production for the mapping flavors.
fn read_map_entries<V: FromJson>(
    d: &mut Decoder<'_>,
    mut put: impl FnMut(String, V),
) -> Result<(), JsonError> {
    let start = d.next()?;
    if start.kind != TokenKind::ObjectStart {
        return Err(mismatch("object", &start.kind, start.offset));
    }

    if d.peek()?.kind == TokenKind::ObjectEnd {
        d.next()?;
        return Ok(());
    }

    loop {
        let name = d.read_member_name()?;
        put(name, V::from_json(d)?);
        let sep = d.next()?;
        match sep.kind {
            TokenKind::ValueDelim => {}
            TokenKind::ObjectEnd => return Ok(()),
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
}

impl<V: FromJson> FromJson for HashMap<String, V> {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let mut map = Self::new();
        read_map_entries(d, |key, value| {
            map.insert(key, value);
        })?;
        Ok(map)
    }
}

impl<V: FromJson> FromJson for BTreeMap<String, V> {
    fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
        let mut map = Self::new();
        read_map_entries(d, |key, value| {
            map.insert(key, value);
        })?;
        Ok(map)
    }
}

impl<'de> Decoder<'de> {
    /// Decode an object into a bound structured type. The instance is
    /// materialized via `Default` and members are applied through the
    /// type's cached binding metadata; unknown wire names are skipped
    /// silently for wire compatibility across schema evolution.
    ///
    /// # Errors
    ///
    /// Structural errors for grammar violations, coercion errors from
    /// member decode, and configuration errors from first-time binding.
    pub fn read_struct<T: JsonBind>(&mut self) -> Result<T, JsonError> {
        let binding = self.registry.binding::<T>()?;
        let start = self.next()?;
        if start.kind != TokenKind::ObjectStart {
            return Err(mismatch(
                binding.type_name(),
                &start.kind,
                start.offset,
            ));
        }

        let mut out = T::default();
        if self.peek()?.kind == TokenKind::ObjectEnd {
            self.next()?;
            return Ok(out);
        }

        // The first member may be the type-hint property; on a concrete
        // target the hint must name this very type.
        let name = self.read_member_name()?;
        if self.config.type_hint_name.as_deref() == Some(name.as_str()) {
            let hint = self.next()?;
            match hint.kind {
                TokenKind::String(value) => {
                    if value != binding.type_name() {
                        return Err(JsonError::UnknownTypeHint {
                            hint: value,
                            offset: hint.offset,
                        });
                    }
                }
                kind => {
                    return Err(JsonError::coercion(
                        format!("type hint must be a string, found {kind}"),
                        hint.offset,
                    ));
                }
            }
        } else {
            self.apply_member(&binding, &mut out, &name)?;
        }

        self.read_remaining_members(&binding, &mut out)?;
        Ok(out)
    }

    /// Decode the remaining members of an object whose opening brace (and
    /// possibly type-hint member) has already been consumed. Used by
    /// polymorphic constructors registered in a [`PolyRegistry`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::read_struct`].
    pub fn finish_struct<T: JsonBind>(&mut self) -> Result<T, JsonError> {
        let binding = self.registry.binding::<T>()?;
        let mut out = T::default();
        self.read_remaining_members(&binding, &mut out)?;
        Ok(out)
    }

    /// Decode a polymorphic target: the object's first member must be the
    /// configured type-hint property, whose value selects a registered
    /// constructor. The writer always emits the hint first, so every
    /// document this codec produces round-trips.
    ///
    /// # Errors
    ///
    /// [`JsonError::Configuration`] when no hint property is configured,
    /// [`JsonError::UnknownTypeHint`] when the hint has no registered
    /// constructor, structural errors when the hint is missing or late.
    pub fn read_poly<B: ?Sized>(
        &mut self,
        registry: &PolyRegistry<B>,
    ) -> Result<Box<B>, JsonError> {
        let Some(hint_name) = self.config.type_hint_name.clone() else {
            return Err(JsonError::configuration(
                "polymorphic decode requires a configured type hint property",
            ));
        };

        let start = self.next()?;
        if start.kind != TokenKind::ObjectStart {
            return Err(mismatch(
                "object with type hint",
                &start.kind,
                start.offset,
            ));
        }

        let name_offset = self.peek()?.offset;
        if self.peek()?.kind == TokenKind::ObjectEnd {
            return Err(JsonError::structural(
                format!("missing type hint property {hint_name:?}"),
                name_offset,
            ));
        }

        let name = self.read_member_name()?;
        if name != hint_name {
            return Err(JsonError::structural(
                format!(
                    "type hint property {hint_name:?} must be the first member, found {name:?}"
                ),
                name_offset,
            ));
        }

        let hint = self.next()?;
        let (value, offset) = match hint.kind {
            TokenKind::String(value) => (value, hint.offset),
            kind => {
                return Err(JsonError::coercion(
                    format!("type hint must be a string, found {kind}"),
                    hint.offset,
                ));
            }
        };

        log::trace!("dispatching on type hint {value:?}");
        match registry.resolve(&value) {
            Some(ctor) => ctor(self),
            None => Err(JsonError::UnknownTypeHint {
                hint: value,
                offset,
            }),
        }
    }

    /// Decode a string token into an enum variant by name.
    ///
    /// # Errors
    ///
    /// Coercion error when the value is not a string or names no variant.
    pub fn read_enum<T: Clone>(
        &mut self,
        type_name: &str,
        variants: &[(&str, T)],
    ) -> Result<T, JsonError> {
        let token = self.next()?;
        match token.kind {
            TokenKind::String(name) => variants
                .iter()
                .find(|(variant, _)| *variant == name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| {
                    JsonError::coercion(
                        format!("{name:?} is not a variant of {type_name}"),
                        token.offset,
                    )
                }),
            kind => Err(mismatch(type_name, &kind, token.offset)),
        }
    }

    fn read_remaining_members<T>(
        &mut self,
        binding: &TypeBinding<T>,
        out: &mut T,
    ) -> Result<(), JsonError> {
        loop {
            let sep = self.next()?;
            match sep.kind {
                TokenKind::ObjectEnd => return Ok(()),
                TokenKind::ValueDelim => {
                    let name = self.read_member_name()?;
                    self.apply_member(binding, out, &name)?;
                }
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
    }

    fn apply_member<T>(
        &mut self,
        binding: &TypeBinding<T>,
        out: &mut T,
        name: &str,
    ) -> Result<(), JsonError> {
        match binding.field(name).and_then(FieldBinding::apply) {
            Some(apply) => apply(out, self),
            // unknown and ignored wire names are skipped, not errored
            None => self.skip_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{BindingBuilder, BindingRegistry};
    use crate::config::JsonConfig;
    use crate::writer::ToJson;
    use std::sync::LazyLock;

    fn decode_as<T: FromJson>(text: &str) -> Result<T, JsonError> {
        crate::Json::default().decode_as(text)
    }

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
        label: Option<String>,
    }

    impl JsonBind for Point {
        fn bind() -> Result<TypeBinding<Self>, JsonError> {
            BindingBuilder::<Self>::new("point")
                .field(
                    "x",
                    |v, d| {
                        v.x = FromJson::from_json(d)?;
                        Ok(())
                    },
                    |v, w| v.x.to_json(w),
                )
                .field(
                    "y",
                    |v, d| {
                        v.y = FromJson::from_json(d)?;
                        Ok(())
                    },
                    |v, w| v.y.to_json(w),
                )
                .field_when(
                    "label",
                    |v, d| {
                        v.label = FromJson::from_json(d)?;
                        Ok(())
                    },
                    |v, w| v.label.to_json(w),
                    |v| v.label.is_some(),
                )
                .build()
        }
    }

    impl FromJson for Point {
        fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
            d.read_struct()
        }
    }

    #[test]
    fn scalar_targets() {
        assert_eq!(decode_as::<i32>("42").unwrap(), 42);
        assert_eq!(decode_as::<u8>("255").unwrap(), 255);
        assert_eq!(
            decode_as::<u128>("18446744073709551616").unwrap(),
            18_446_744_073_709_551_616
        );
        assert_eq!(decode_as::<f64>("2.5e3").unwrap(), 2500.0);
        assert_eq!(decode_as::<bool>("true").unwrap(), true);
        assert_eq!(decode_as::<String>(r#""hi""#).unwrap(), "hi");
        assert_eq!(decode_as::<char>(r#""x""#).unwrap(), 'x');
    }

    #[test]
    fn integer_overflow_is_a_coercion_error() {
        assert!(matches!(
            decode_as::<i8>("400"),
            Err(JsonError::TypeCoercion { offset: 0, .. })
        ));
        assert!(matches!(
            decode_as::<u32>("-1"),
            Err(JsonError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn whole_float_text_coerces_to_integer() {
        assert_eq!(decode_as::<i64>("1e3").unwrap(), 1000);
        assert!(matches!(
            decode_as::<i64>("1.5"),
            Err(JsonError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn non_finite_floats() {
        assert!(decode_as::<f64>("NaN").unwrap().is_nan());
        assert_eq!(decode_as::<f64>("-Infinity").unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn null_into_non_nullable_fails() {
        assert!(matches!(
            decode_as::<i64>("null"),
            Err(JsonError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn nullable_targets() {
        assert_eq!(decode_as::<Option<i64>>("null").unwrap(), None);
        assert_eq!(decode_as::<Option<i64>>("7").unwrap(), Some(7));
    }

    #[test]
    fn container_flavors() {
        assert_eq!(decode_as::<Vec<i64>>("[1,2,3]").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_as::<[i64; 3]>("[1,2,3]").unwrap(), [1, 2, 3]);
        assert_eq!(
            decode_as::<VecDeque<i64>>("[1,2,3]").unwrap(),
            VecDeque::from(vec![1, 2, 3])
        );
        let set = decode_as::<HashSet<i64>>("[1,2,2,3,3,3]").unwrap();
        assert_eq!(set.len(), 3);
        let map =
            decode_as::<BTreeMap<String, i64>>(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(map["a"], 1);
        assert_eq!(map["b"], 2);
    }

    #[test]
    fn fixed_array_length_mismatch() {
        assert!(matches!(
            decode_as::<[i64; 3]>("[1,2]"),
            Err(JsonError::TypeCoercion { offset: 0, .. })
        ));
    }

    #[test]
    fn struct_decode() {
        let point: Point =
            decode_as(r#"{"x": 1, "y": -2, "label": "origin-ish"}"#).unwrap();
        assert_eq!(
            point,
            Point {
                x: 1,
                y: -2,
                label: Some("origin-ish".into())
            }
        );
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let point: Point =
            decode_as(r#"{"x": 1, "mystery": {"deep": [1,2]}, "y": 2}"#)
                .unwrap();
        assert_eq!(point.x, 1);
        assert_eq!(point.y, 2);
    }

    #[test]
    fn member_coercion_failure_fails_whole_decode() {
        assert!(matches!(
            decode_as::<Point>(r#"{"x": "not a number"}"#),
            Err(JsonError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn nested_struct_in_containers() {
        let points: Vec<Point> =
            decode_as(r#"[{"x":1,"y":2},{"x":3,"y":4}]"#).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].x, 3);
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    enum Color {
        #[default]
        Red,
        Green,
        Blue,
    }

    impl FromJson for Color {
        fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
            d.read_enum(
                "Color",
                &[
                    ("red", Self::Red),
                    ("green", Self::Green),
                    ("blue", Self::Blue),
                ],
            )
        }
    }

    #[test]
    fn enum_by_name() {
        assert_eq!(decode_as::<Color>(r#""green""#).unwrap(), Color::Green);
        assert!(matches!(
            decode_as::<Color>(r#""mauve""#),
            Err(JsonError::TypeCoercion { .. })
        ));
        assert!(matches!(
            decode_as::<Color>("3"),
            Err(JsonError::TypeCoercion { .. })
        ));
    }

    // -- polymorphic decode ---------------------------------------------

    trait Shape {
        fn area(&self) -> f64;
    }

    #[derive(Default)]
    struct Circle {
        radius: f64,
    }

    #[derive(Default)]
    struct Rect {
        width: f64,
        height: f64,
    }

    impl Shape for Circle {
        fn area(&self) -> f64 {
            std::f64::consts::PI * self.radius * self.radius
        }
    }

    impl Shape for Rect {
        fn area(&self) -> f64 {
            self.width * self.height
        }
    }

    impl JsonBind for Circle {
        fn bind() -> Result<TypeBinding<Self>, JsonError> {
            BindingBuilder::<Self>::new("circle")
                .field(
                    "radius",
                    |v, d| {
                        v.radius = FromJson::from_json(d)?;
                        Ok(())
                    },
                    |v, w| v.radius.to_json(w),
                )
                .build()
        }
    }

    impl JsonBind for Rect {
        fn bind() -> Result<TypeBinding<Self>, JsonError> {
            BindingBuilder::<Self>::new("rect")
                .field(
                    "width",
                    |v, d| {
                        v.width = FromJson::from_json(d)?;
                        Ok(())
                    },
                    |v, w| v.width.to_json(w),
                )
                .field(
                    "height",
                    |v, d| {
                        v.height = FromJson::from_json(d)?;
                        Ok(())
                    },
                    |v, w| v.height.to_json(w),
                )
                .build()
        }
    }

    static SHAPES: LazyLock<PolyRegistry<dyn Shape>> = LazyLock::new(|| {
        let shapes = PolyRegistry::new();
        shapes.register("circle", |d| {
            Ok(Box::new(d.finish_struct::<Circle>()?) as Box<dyn Shape>)
        });
        shapes.register("rect", |d| {
            Ok(Box::new(d.finish_struct::<Rect>()?) as Box<dyn Shape>)
        });
        shapes
    });

    impl FromJson for Box<dyn Shape> {
        fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
            d.read_poly(&SHAPES)
        }
    }

    fn hinted() -> crate::Json {
        crate::Json::new(JsonConfig::new().type_hint_name("kind"))
    }

    #[test]
    fn hint_selects_derived_type() {
        let shape: Box<dyn Shape> = hinted()
            .decode_as(r#"{"kind": "rect", "width": 3, "height": 4}"#)
            .unwrap();
        assert_eq!(shape.area(), 12.0);
    }

    #[test]
    fn unknown_hint_rejected() {
        let result: Result<Box<dyn Shape>, _> =
            hinted().decode_as(r#"{"kind": "pentagon", "sides": 5}"#);
        assert!(matches!(
            result,
            Err(JsonError::UnknownTypeHint { hint, .. }) if hint == "pentagon"
        ));
    }

    #[test]
    fn late_hint_rejected() {
        let result: Result<Box<dyn Shape>, _> =
            hinted().decode_as(r#"{"radius": 1, "kind": "circle"}"#);
        assert!(matches!(result, Err(JsonError::Structural { .. })));
    }

    #[test]
    fn poly_without_configured_hint_is_a_configuration_error() {
        let result: Result<Box<dyn Shape>, _> =
            crate::Json::default().decode_as(r#"{"kind": "circle"}"#);
        assert!(matches!(result, Err(JsonError::Configuration { .. })));
    }

    #[test]
    fn hint_on_concrete_target_must_match() {
        let circle: Circle = {
            impl FromJson for Circle {
                fn from_json(d: &mut Decoder<'_>) -> Result<Self, JsonError> {
                    d.read_struct()
                }
            }
            hinted()
                .decode_as(r#"{"kind": "circle", "radius": 2.0}"#)
                .unwrap()
        };
        assert_eq!(circle.radius, 2.0);

        let result: Result<Circle, _> =
            hinted().decode_as(r#"{"kind": "rect", "radius": 2.0}"#);
        assert!(matches!(result, Err(JsonError::UnknownTypeHint { .. })));
    }

    #[test]
    fn poly_in_containers() {
        let shapes: Vec<Box<dyn Shape>> = hinted()
            .decode_as(
                r#"[{"kind":"circle","radius":1},
                    {"kind":"rect","width":2,"height":5}]"#,
            )
            .unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].area(), 10.0);
    }

    #[test]
    fn registry_isolation_between_instances() {
        let registry = BindingRegistry::new();
        let config = JsonConfig::new();
        let mut decoder =
            Decoder::from_str(r#"{"x":9,"y":9}"#, &config, &registry);
        let point: Point = FromJson::from_json(&mut decoder).unwrap();
        decoder.expect_end().unwrap();
        assert_eq!(point.x, 9);
    }
}
