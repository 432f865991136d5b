//! # Binding Metadata
//!
//! Per-type mapping from wire property names to member accessors. A
//! [`TypeBinding`] is built once through the [`BindingBuilder`] (the
//! explicit-registration analogue of reflection scanning), is immutable
//! afterwards, and is cached for the process lifetime by
//! [`crate::bind::BindingRegistry`].
use crate::error::JsonError;
use crate::reader::Decoder;
use crate::writer::JsonWriter;

/// Applies one decoded member value onto a partially-built instance.
pub type ApplyFn<T> = fn(&mut T, &mut Decoder<'_>) -> Result<(), JsonError>;

/// Writes one member's value (the name/colon are written by the caller).
pub type EmitFn<T> = fn(&T, &mut JsonWriter<'_>) -> Result<(), JsonError>;

/// Conditional-inclusion predicate evaluated against the current instance.
pub type WhenFn<T> = fn(&T) -> bool;

/// Declares the binding for one type.
///
/// Implementations construct a [`BindingBuilder`], register each member
/// under its wire name, and finish with [`BindingBuilder::build`]. The
/// result is cached; `bind` runs at most a handful of times per process
/// even under concurrent first use.
pub trait JsonBind: Default + Sized + 'static {
    /// Build the immutable binding metadata for this type.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::Configuration`] for invalid metadata, e.g.
    /// duplicate wire names.
    fn bind() -> Result<TypeBinding<Self>, JsonError>;
}

/// One member of a bound type.
pub struct FieldBinding<T> {
    wire_name: &'static str,
    ignored: bool,
    apply: Option<ApplyFn<T>>,
    emit: Option<EmitFn<T>>,
    when: Option<WhenFn<T>>,
}

impl<T> FieldBinding<T> {
    /// The property name as it appears in JSON text.
    pub fn wire_name(&self) -> &'static str {
        self.wire_name
    }

    /// Whether this member is declared but never read or written.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// The decode-side accessor, absent for ignored members.
    pub fn apply(&self) -> Option<ApplyFn<T>> {
        self.apply
    }

    /// The encode-side accessor, absent for ignored members.
    pub fn emit(&self) -> Option<EmitFn<T>> {
        self.emit
    }

    /// Whether this member should be written for the given instance.
    pub fn should_emit(&self, instance: &T) -> bool {
        !self.ignored && self.when.is_none_or(|when| when(instance))
    }
}

/// Immutable wire-name → member mapping for one type, members kept in
/// declaration order for stable output.
pub struct TypeBinding<T> {
    type_name: &'static str,
    fields: Vec<FieldBinding<T>>,
}

impl<T> TypeBinding<T> {
    /// The identifier used for this type in type-hint properties.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// All members in declaration order.
    pub fn fields(&self) -> &[FieldBinding<T>] {
        &self.fields
    }

    /// Look up a member by wire name.
    pub fn field(&self, wire_name: &str) -> Option<&FieldBinding<T>> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }
}

/// Builder for [`TypeBinding`]; wire-name collisions surface at build time,
/// not at parse time.
pub struct BindingBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldBinding<T>>,
}

impl<T> BindingBuilder<T> {
    /// Start a binding for the type identified on the wire by `type_name`.
    ///
    /// The target type cannot be inferred from the accessor closures
    /// alone; name it explicitly, `BindingBuilder::<T>::new(...)` (or
    /// `::<Self>` inside a [`JsonBind::bind`] body).
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Register a member under its wire name.
    #[must_use]
    pub fn field(
        mut self,
        wire_name: &'static str,
        apply: ApplyFn<T>,
        emit: EmitFn<T>,
    ) -> Self {
        self.fields.push(FieldBinding {
            wire_name,
            ignored: false,
            apply: Some(apply),
            emit: Some(emit),
            when: None,
        });
        self
    }

    /// Register a member that is only written when `when` evaluates true
    /// for the instance being serialized.
    #[must_use]
    pub fn field_when(
        mut self,
        wire_name: &'static str,
        apply: ApplyFn<T>,
        emit: EmitFn<T>,
        when: WhenFn<T>,
    ) -> Self {
        self.fields.push(FieldBinding {
            wire_name,
            ignored: false,
            apply: Some(apply),
            emit: Some(emit),
            when: Some(when),
        });
        self
    }

    /// Declare a wire name that is recognized but never read or written.
    #[must_use]
    pub fn ignore(mut self, wire_name: &'static str) -> Self {
        self.fields.push(FieldBinding {
            wire_name,
            ignored: true,
            apply: None,
            emit: None,
            when: None,
        });
        self
    }

    /// Finish the binding.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::Configuration`] if two members share a wire
    /// name after overrides.
    pub fn build(self) -> Result<TypeBinding<T>, JsonError> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i]
                .iter()
                .any(|prev| prev.wire_name == field.wire_name)
            {
                return Err(JsonError::configuration(format!(
                    "duplicate wire name {:?} in binding for {}",
                    field.wire_name, self.type_name
                )));
            }
        }
        Ok(TypeBinding {
            type_name: self.type_name,
            fields: self.fields,
        })
    }
}
