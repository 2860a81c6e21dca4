//! Model identity and per-model relationship metadata.
//!
//! Every persisted model is identified by a [`ModelId`]. Rust model types
//! implement [`Schema`] to declare their name and association table; the
//! `ModelId` for such a type carries a function pointer back to that table so
//! descriptors can be resolved without holding a copy of them.

use crate::relationship::RelationshipDescriptor;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Static metadata for a model type.
///
/// # Example
///
/// ```ignore
/// struct User;
///
/// impl Schema for User {
///     const MODEL: &'static str = "users";
///
///     fn associations() -> &'static [RelationshipDescriptor] {
///         const ASSOCS: &[RelationshipDescriptor] = &[RelationshipDescriptor::has_one(
///             "profile",
///             ModelId::of::<User>(),
///             ModelId::of::<Profile>(),
///             "user_id",
///         )];
///         ASSOCS
///     }
/// }
/// ```
pub trait Schema: 'static {
    /// Model identifier (usually the table/source name).
    const MODEL: &'static str;

    /// Associations declared on this model.
    fn associations() -> &'static [RelationshipDescriptor] {
        &[]
    }
}

fn no_associations() -> &'static [RelationshipDescriptor] {
    &[]
}

/// Identifier of a model, comparable by name.
#[derive(Clone, Copy)]
pub struct ModelId {
    name: &'static str,
    associations_fn: fn() -> &'static [RelationshipDescriptor],
}

impl ModelId {
    /// Identifier of a Rust model type.
    #[must_use]
    pub const fn of<M: Schema>() -> Self {
        Self {
            name: M::MODEL,
            associations_fn: M::associations,
        }
    }

    /// Identifier of a model with no compile-time metadata.
    ///
    /// Associations of such a model can only be resolved through a
    /// [`SchemaRegistry`](crate::SchemaRegistry).
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            associations_fn: no_associations,
        }
    }

    /// The model name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// All associations declared on the model type.
    #[must_use]
    pub fn associations(&self) -> &'static [RelationshipDescriptor] {
        (self.associations_fn)()
    }

    /// Find the association with the given field name.
    #[must_use]
    pub fn association(&self, field: &str) -> Option<&'static RelationshipDescriptor> {
        self.associations().iter().find(|d| d.field == field)
    }
}

// Identity is the model name; the metadata pointer is not compared.
impl PartialEq for ModelId {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ModelId {}

impl Hash for ModelId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelId").field(&self.name).finish()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account;

    impl Schema for Account {
        const MODEL: &'static str = "accounts";
    }

    #[test]
    fn test_model_id_of_uses_model_name() {
        let id = ModelId::of::<Account>();
        assert_eq!(id.name(), "accounts");
        assert_eq!(id.to_string(), "accounts");
        assert!(id.associations().is_empty());
    }

    #[test]
    fn test_model_id_equality_ignores_metadata() {
        assert_eq!(ModelId::of::<Account>(), ModelId::named("accounts"));
        assert_ne!(ModelId::named("accounts"), ModelId::named("users"));
    }

    #[test]
    fn test_named_model_has_no_associations() {
        let id = ModelId::named("events");
        assert!(id.association("owner").is_none());
        assert_eq!(format!("{id:?}"), "ModelId(\"events\")");
    }
}
