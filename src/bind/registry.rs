//! # Binding Caches
//!
//! The [`BindingRegistry`] is the one intentionally process-wide piece of
//! state: an immutable-after-build cache of [`TypeBinding`]s keyed by type
//! identity, safe for concurrent read and lazy concurrent first-build.
//! Tests construct fresh registries instead of resetting the global one.
//!
//! The [`PolyRegistry`] maps type-hint identifiers to constructors for
//! polymorphic decode targets.
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::bind::metadata::{JsonBind, TypeBinding};
use crate::error::JsonError;
use crate::reader::Decoder;

/// Process-wide cache of type bindings, keyed by [`TypeId`].
#[derive(Default)]
pub struct BindingRegistry {
    bindings: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl BindingRegistry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the binding for `T`, building and caching it on first use.
    ///
    /// Two threads racing on the same type may both compute the binding;
    /// both results are equivalent and only the first insert is retained.
    ///
    /// # Errors
    ///
    /// Propagates [`JsonError::Configuration`] from `T::bind()`.
    pub fn binding<T: JsonBind>(
        &self,
    ) -> Result<Arc<TypeBinding<T>>, JsonError> {
        let key = TypeId::of::<T>();

        if let Some(entry) = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Self::downcast::<T>(entry));
        }

        // build outside the lock
        let built: Arc<TypeBinding<T>> = Arc::new(T::bind()?);
        log::debug!("built binding for {}", built.type_name());

        let mut bindings = self
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = bindings
            .entry(key)
            .or_insert_with(|| built as Arc<dyn Any + Send + Sync>);
        Ok(Self::downcast::<T>(entry))
    }

    /// Drop every cached binding.
    pub fn clear(&self) {
        self.bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn downcast<T: JsonBind>(
        entry: &Arc<dyn Any + Send + Sync>,
    ) -> Arc<TypeBinding<T>> {
        entry
            .clone()
            .downcast::<TypeBinding<T>>()
            .expect("binding cache entry stored under its own TypeId")
    }
}

static GLOBAL: LazyLock<Arc<BindingRegistry>> =
    LazyLock::new(|| Arc::new(BindingRegistry::new()));

/// The process-wide default registry used by [`crate::Json`] unless an
/// explicit one is injected.
pub fn global() -> Arc<BindingRegistry> {
    GLOBAL.clone()
}

/// Constructor invoked with the decoder positioned just after the type-hint
/// member; finishes reading the object and returns the boxed instance.
pub type PolyCtor<B> = fn(&mut Decoder<'_>) -> Result<Box<B>, JsonError>;

/// Maps type-hint identifiers to constructors for one polymorphic decode
/// family (typically a trait object type).
pub struct PolyRegistry<B: ?Sized> {
    ctors: RwLock<HashMap<&'static str, PolyCtor<B>>>,
}

impl<B: ?Sized> PolyRegistry<B> {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self {
            ctors: RwLock::new(HashMap::new()),
        }
    }

    /// Register a constructor under its hint identifier. Re-registering a
    /// name replaces the previous constructor.
    pub fn register(&self, name: &'static str, ctor: PolyCtor<B>) {
        self.ctors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, ctor);
    }

    /// Resolve a hint identifier read from the wire.
    pub fn resolve(&self, name: &str) -> Option<PolyCtor<B>> {
        self.ctors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }
}

impl<B: ?Sized> Default for PolyRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::metadata::BindingBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static BUILD_COUNT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct Counted;

    impl JsonBind for Counted {
        fn bind() -> Result<TypeBinding<Self>, JsonError> {
            BUILD_COUNT.fetch_add(1, Ordering::SeqCst);
            BindingBuilder::new("counted").build()
        }
    }

    #[test]
    fn binding_built_once_per_registry() {
        let registry = BindingRegistry::new();
        let before = BUILD_COUNT.load(Ordering::SeqCst);
        let first = registry.binding::<Counted>().unwrap();
        let second = registry.binding::<Counted>().unwrap();
        assert_eq!(BUILD_COUNT.load(Ordering::SeqCst), before + 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn clear_forces_rebuild() {
        let registry = BindingRegistry::new();
        registry.binding::<Counted>().unwrap();
        let before = BUILD_COUNT.load(Ordering::SeqCst);
        registry.clear();
        registry.binding::<Counted>().unwrap();
        assert_eq!(BUILD_COUNT.load(Ordering::SeqCst), before + 1);
    }

    #[derive(Default)]
    struct Broken;

    impl JsonBind for Broken {
        fn bind() -> Result<TypeBinding<Self>, JsonError> {
            BindingBuilder::new("broken")
                .ignore("dup")
                .ignore("dup")
                .build()
        }
    }

    #[test]
    fn configuration_error_surfaces_at_first_bind() {
        let registry = BindingRegistry::new();
        assert!(matches!(
            registry.binding::<Broken>(),
            Err(JsonError::Configuration { .. })
        ));
    }
}
