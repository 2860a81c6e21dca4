//! Core types for relquery.
//!
//! This crate holds the pieces every other relquery crate builds on:
//!
//! - `Schema` and `ModelId` for naming models and their static metadata
//! - `RelationshipDescriptor` for declared associations
//! - `SchemaReflection` for resolving `(model, field)` to a descriptor
//! - `HasOne` lazy association handles and the `AssociationLoader` seam
//! - `Record` and `RecordFactory` for building associated records
//! - `Outcome` re-export from asupersync for cancel-correct loading
//! - `Cx` context for structured concurrency

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod association;
pub mod error;
pub mod identifiers;
pub mod record;
pub mod reflection;
pub mod relationship;
pub mod schema;
pub mod value;

pub use association::{AssociationInfo, AssociationLoader, HasOne, Loaded};
pub use error::{
    AssociationNotLoadedError, Error, InvalidExpressionError, Result, SchemaError,
    SchemaErrorKind, TypeError,
};
pub use identifiers::is_plain_identifier;
pub use record::{DynamicFactory, FromFields, Record, RecordFactory, TypedFactory, merge_fields};
pub use reflection::{SchemaReflection, SchemaRegistry, StaticReflection};
pub use relationship::{AssociationKind, RelationshipDescriptor, find_association};
pub use schema::{ModelId, Schema};
pub use value::Value;
