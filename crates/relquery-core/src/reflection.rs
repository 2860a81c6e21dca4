//! Schema reflection: resolving `(model, field)` to a relationship descriptor.
//!
//! Association handles never store their descriptor. Every descriptor-dependent
//! operation goes through a [`SchemaReflection`] so the answer always reflects
//! the current metadata. Two implementations are provided:
//!
//! - [`StaticReflection`] resolves through the metadata table embedded in a
//!   [`ModelId`] built with `ModelId::of::<M>()`.
//! - [`SchemaRegistry`] is a table assembled at startup, for models that are
//!   not Rust types. Once built it is only read, so it can be shared across
//!   threads behind an `Arc` without locking.

use crate::error::{Error, Result, SchemaError};
use crate::relationship::RelationshipDescriptor;
use crate::schema::{ModelId, Schema};
use std::collections::HashMap;

/// Lookup of relationship descriptors by owner model and field name.
pub trait SchemaReflection {
    /// Find the descriptor for `field` on `owner`, if one is declared.
    fn association(&self, owner: ModelId, field: &str) -> Option<&RelationshipDescriptor>;

    /// Like [`association`](Self::association), failing with a schema error
    /// when nothing is declared.
    fn resolve(&self, owner: ModelId, field: &str) -> Result<&RelationshipDescriptor> {
        self.association(owner, field)
            .ok_or_else(|| Error::Schema(SchemaError::association_not_found(owner.name(), field)))
    }
}

/// Reflection backed by the `Schema` metadata carried in each `ModelId`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticReflection;

impl SchemaReflection for StaticReflection {
    fn association(&self, owner: ModelId, field: &str) -> Option<&RelationshipDescriptor> {
        owner.association(field)
    }
}

/// Runtime-assembled reflection table.
///
/// # Example
///
/// ```ignore
/// let registry = SchemaRegistry::new()
///     .register(RelationshipDescriptor::has_one(
///         "settings",
///         ModelId::named("tenants"),
///         ModelId::named("tenant_settings"),
///         "tenant_id",
///     ))
///     .register_model::<User>();
/// let shared = Arc::new(registry);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    models: HashMap<&'static str, HashMap<&'static str, RelationshipDescriptor>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under `(descriptor.owner, descriptor.field)`.
    ///
    /// A later registration for the same pair replaces the earlier one.
    #[must_use]
    pub fn register(mut self, descriptor: RelationshipDescriptor) -> Self {
        tracing::trace!(
            owner = descriptor.owner.name(),
            field = descriptor.field,
            associated = descriptor.associated.name(),
            "Registering association"
        );
        let previous = self
            .models
            .entry(descriptor.owner.name())
            .or_default()
            .insert(descriptor.field, descriptor);
        if previous.is_some() {
            tracing::warn!(
                owner = descriptor.owner.name(),
                field = descriptor.field,
                "Association registered twice, keeping the latest descriptor"
            );
        }
        self
    }

    /// Register every association declared by a model type.
    #[must_use]
    pub fn register_model<M: Schema>(self) -> Self {
        M::associations()
            .iter()
            .fold(self, |registry, descriptor| registry.register(*descriptor))
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.values().map(HashMap::len).sum()
    }

    /// Check if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if `owner` declares `field`.
    #[must_use]
    pub fn contains(&self, owner: ModelId, field: &str) -> bool {
        self.association(owner, field).is_some()
    }
}

impl SchemaReflection for SchemaRegistry {
    fn association(&self, owner: ModelId, field: &str) -> Option<&RelationshipDescriptor> {
        self.models.get(owner.name())?.get(field)
    }
}

impl<R: SchemaReflection + ?Sized> SchemaReflection for &R {
    fn association(&self, owner: ModelId, field: &str) -> Option<&RelationshipDescriptor> {
        (**self).association(owner, field)
    }
}

impl<R: SchemaReflection + ?Sized> SchemaReflection for std::sync::Arc<R> {
    fn association(&self, owner: ModelId, field: &str) -> Option<&RelationshipDescriptor> {
        (**self).association(owner, field)
    }
}
