//! Field expression validation for relquery.
//!
//! `relquery-query` sits between a query front end and query translation. The
//! front end hands over an already-parsed [`Expr`] tree plus the [`Bindings`]
//! introduced by the enclosing query; [`escape`] accepts only references of the
//! form `bound.field` (alone, or in a flat tuple or list) and normalizes them to
//! a [`ValidatedExpression`].
//!
//! Translation code downstream can then rely on every field reference naming a
//! bound source and a single plain field, without re-checking.

pub mod bindings;
pub mod escape;
pub mod expr;

pub use bindings::Bindings;
pub use escape::{FieldRef, ValidatedExpression, escape};
pub use expr::Expr;
