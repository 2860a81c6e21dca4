//! Relationship descriptors.
//!
//! A descriptor is static metadata describing how an owner model relates to
//! an associated model: which field on the owner is matched (`key`) and which
//! field on the associated model stores the matching value (`assoc_key`).
//! Descriptors are declared through [`Schema::associations`] and are read-only
//! to everything else in this crate.

use crate::schema::{ModelId, Schema};
use std::fmt;

/// The kind of association a descriptor declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// The associated model stores the owner's key: `User` has one `Profile`.
    #[default]
    HasOne,
    /// The owner stores the associated model's key: `Profile` belongs to `User`.
    BelongsTo,
    /// Like `HasOne`, but many associated rows may match.
    HasMany,
}

impl AssociationKind {
    /// Snake-case name, as used in diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssociationKind::HasOne => "has_one",
            AssociationKind::BelongsTo => "belongs_to",
            AssociationKind::HasMany => "has_many",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about one association declared on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipDescriptor {
    /// Name of the association field on the owner.
    pub field: &'static str,

    /// Model declaring the association.
    pub owner: ModelId,

    /// The related model.
    pub associated: ModelId,

    /// Kind of association.
    pub kind: AssociationKind,

    /// Field on `owner` used for matching (typically the primary key).
    pub key: &'static str,

    /// Field on `associated` storing the matching value (the foreign key).
    pub assoc_key: &'static str,
}

impl RelationshipDescriptor {
    /// Declare a has-one association keyed on the owner's `id`.
    #[must_use]
    pub const fn has_one(
        field: &'static str,
        owner: ModelId,
        associated: ModelId,
        assoc_key: &'static str,
    ) -> Self {
        Self {
            field,
            owner,
            associated,
            kind: AssociationKind::HasOne,
            key: "id",
            assoc_key,
        }
    }

    /// Set the owner field used for matching.
    #[must_use]
    pub const fn key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Set the foreign key field on the associated model.
    #[must_use]
    pub const fn assoc_key(mut self, assoc_key: &'static str) -> Self {
        self.assoc_key = assoc_key;
        self
    }

    /// Set the association kind.
    #[must_use]
    pub const fn kind(mut self, kind: AssociationKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Find an association by field name on a model type.
///
/// # Example
///
/// ```ignore
/// let rel = find_association::<User>("profile");
/// assert_eq!(rel.unwrap().assoc_key, "user_id");
/// ```
pub fn find_association<M: Schema>(field: &str) -> Option<&'static RelationshipDescriptor> {
    M::associations().iter().find(|d| d.field == field)
}
