//! Lazy associations and validated field expressions.
//!
//! `relquery` is the facade crate. It re-exports the association layer from
//! `relquery-core` and the expression validator from `relquery-query`.
//!
//! # Associations
//!
//! Models declare their associations as static metadata. Each owner record
//! embeds one [`HasOne`] handle per has-one field; the handle starts unloaded,
//! is filled by a fetch step, and can build new associated records with the
//! foreign key already set.
//!
//! ```ignore
//! use relquery::prelude::*;
//!
//! struct User;
//! struct Profile;
//!
//! impl Schema for User {
//!     const MODEL: &'static str = "users";
//!
//!     fn associations() -> &'static [RelationshipDescriptor] {
//!         const ASSOCS: &[RelationshipDescriptor] = &[RelationshipDescriptor::has_one(
//!             "profile",
//!             ModelId::of::<User>(),
//!             ModelId::of::<Profile>(),
//!             "user_id",
//!         )];
//!         ASSOCS
//!     }
//! }
//!
//! impl Schema for Profile {
//!     const MODEL: &'static str = "profiles";
//! }
//!
//! let handle = HasOne::<Record>::on::<User>("profile").with_primary_key(1_i64);
//! let draft = handle.build([("bio", "hello")])?;
//! assert_eq!(draft.get("user_id"), Some(&Value::BigInt(1)));
//! ```
//!
//! # Field expressions
//!
//! ```ignore
//! use relquery::prelude::*;
//!
//! let bindings = Bindings::new().bind("u", ModelId::of::<User>());
//! let fields = escape(&Expr::tuple([Expr::dot("u", "id"), Expr::dot("u", "name")]), &bindings)?;
//! assert_eq!(fields.to_string(), "(u.id, u.name)");
//! ```

pub use relquery_core::{
    AssociationInfo, AssociationKind, AssociationLoader, AssociationNotLoadedError, Cx,
    DynamicFactory, Error, FromFields, HasOne, InvalidExpressionError, Loaded, ModelId, Outcome,
    Record, RecordFactory, RelationshipDescriptor, Result, Schema, SchemaError, SchemaErrorKind,
    SchemaReflection, SchemaRegistry, StaticReflection, TypeError, TypedFactory, Value,
    find_association, is_plain_identifier,
};
pub use relquery_query::{Bindings, Expr, FieldRef, ValidatedExpression, escape};

/// Commonly used items.
///
/// ```ignore
/// use relquery::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // asupersync
        Cx,
        Outcome,
        // Associations
        AssociationLoader,
        HasOne,
        Loaded,
        ModelId,
        Record,
        RecordFactory,
        RelationshipDescriptor,
        Schema,
        SchemaReflection,
        SchemaRegistry,
        StaticReflection,
        TypedFactory,
        // Expressions
        Bindings,
        Expr,
        FieldRef,
        ValidatedExpression,
        escape,
        // Errors and values
        Error,
        Result,
        Value,
    };
}
