//! # Type Binding
//!
//! Explicit per-type registration of wire-name → member mappings, plus the
//! process-wide caches that make binding a build-once operation.
pub mod metadata;
pub mod registry;

// Re-exports
pub use metadata::{
    ApplyFn, BindingBuilder, EmitFn, FieldBinding, JsonBind, TypeBinding,
    WhenFn,
};
pub use registry::{BindingRegistry, PolyCtor, PolyRegistry, global};
