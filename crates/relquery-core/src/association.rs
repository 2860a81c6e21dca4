//! Lazy association handles.
//!
//! A [`HasOne<T>`] is embedded in an owner record, one per has-one field. It
//! tracks whether the related value has been fetched and remembers the owner's
//! key so new related records can be built with the foreign key filled in.
//!
//! Handles are values: every update returns a new handle and leaves the
//! original untouched, so they fit copy-on-write record updates.
//!
//! # States
//!
//! - **Unloaded**: created by [`HasOne::new`]; reading the value fails.
//! - **Loaded**: set by [`HasOne::with_loaded`] (or [`HasOne::load`]); the value
//!   may itself be `None` when no related row exists.
//!
//! There is no way back from loaded to unloaded; build a fresh handle instead.
//!
//! # Example
//!
//! ```ignore
//! let handle = HasOne::<Profile>::new("profile", ModelId::of::<User>())
//!     .with_primary_key(user.id);
//! assert!(!handle.is_loaded());
//!
//! let draft = handle.build([("bio", "hello")])?;
//! assert_eq!(draft.get("user_id"), Some(&Value::from(user.id)));
//!
//! let handle = handle.with_loaded(Some(profile));
//! assert!(handle.resolve()?.is_some());
//! ```

use crate::error::{AssociationNotLoadedError, Error, Result, SchemaError};
use crate::record::{DynamicFactory, Record, RecordFactory, merge_fields};
use crate::reflection::{SchemaReflection, StaticReflection};
use crate::relationship::{AssociationKind, RelationshipDescriptor};
use crate::schema::{ModelId, Schema};
use crate::value::Value;
use asupersync::{Cx, Outcome};
use serde::{Serialize, Serializer};
use std::fmt;
use std::future::Future;

/// Load state of an association.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loaded<T> {
    /// Not fetched yet.
    #[default]
    NotLoaded,
    /// Fetched.
    Loaded(T),
}

impl<T> Loaded<T> {
    /// Check if the value has been fetched.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Loaded::Loaded(_))
    }

    /// Borrow the fetched value, if any.
    #[must_use]
    pub const fn as_ref(&self) -> Loaded<&T> {
        match self {
            Loaded::NotLoaded => Loaded::NotLoaded,
            Loaded::Loaded(v) => Loaded::Loaded(v),
        }
    }

    /// Convert into an `Option`, `None` meaning not fetched.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Loaded::NotLoaded => None,
            Loaded::Loaded(v) => Some(v),
        }
    }
}

/// Fetches the related value of an association.
///
/// Implemented by the session layer; the handle calls it with the resolved
/// descriptor and the owner key it captured.
pub trait AssociationLoader<T> {
    /// Fetch the associated value whose `descriptor.assoc_key` equals `key`.
    fn fetch(
        &mut self,
        cx: &Cx,
        descriptor: &RelationshipDescriptor,
        key: Value,
    ) -> impl Future<Output = Outcome<Option<T>, Error>> + Send;
}

/// One side of a has-one association, attached to an owner record.
#[derive(Clone, PartialEq)]
pub struct HasOne<T> {
    loaded: Loaded<Option<T>>,
    target: ModelId,
    name: &'static str,
    primary_key: Value,
}

impl<T> HasOne<T> {
    /// Create an unloaded handle for association `name` on model `target`.
    ///
    /// The captured key starts as NULL.
    #[must_use]
    pub fn new(name: &'static str, target: ModelId) -> Self {
        Self {
            loaded: Loaded::NotLoaded,
            target,
            name,
            primary_key: Value::Null,
        }
    }

    /// Create an unloaded handle for association `name` on model type `M`.
    #[must_use]
    pub fn on<M: Schema>(name: &'static str) -> Self {
        Self::new(name, ModelId::of::<M>())
    }

    /// The current load state.
    #[must_use]
    pub fn loaded(&self) -> &Loaded<Option<T>> {
        &self.loaded
    }

    /// Return a handle whose load state is `Loaded(value)`.
    ///
    /// `None` records that no related row exists; it still counts as loaded.
    #[must_use]
    pub fn with_loaded(self, value: Option<T>) -> Self {
        Self {
            loaded: Loaded::Loaded(value),
            ..self
        }
    }

    /// The owner model.
    #[must_use]
    pub fn target(&self) -> ModelId {
        self.target
    }

    /// The association field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The owner key captured for building related records.
    #[must_use]
    pub fn primary_key(&self) -> &Value {
        &self.primary_key
    }

    /// Return a handle with the captured owner key replaced.
    #[must_use]
    pub fn with_primary_key(self, key: impl Into<Value>) -> Self {
        Self {
            primary_key: key.into(),
            ..self
        }
    }

    /// Check if the related value has been fetched.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_loaded()
    }

    /// Get the fetched value.
    ///
    /// Returns `Ok(None)` when loaded with no related row, and
    /// `AssociationNotLoadedError` when nothing has been fetched.
    pub fn resolve(&self) -> Result<Option<&T>> {
        match &self.loaded {
            Loaded::Loaded(value) => Ok(value.as_ref()),
            Loaded::NotLoaded => Err(Error::NotLoaded(AssociationNotLoadedError {
                kind: AssociationKind::HasOne,
                owner: self.target.name(),
                name: self.name,
            })),
        }
    }

    /// Resolve this handle's descriptor through `reflection`.
    ///
    /// Fails if nothing is declared for the handle's field, or if the declared
    /// association is not a has-one.
    pub fn descriptor<'r, R>(&self, reflection: &'r R) -> Result<&'r RelationshipDescriptor>
    where
        R: SchemaReflection + ?Sized,
    {
        let descriptor = reflection.resolve(self.target, self.name)?;
        if descriptor.kind != AssociationKind::HasOne {
            return Err(Error::Schema(SchemaError::kind_mismatch(
                self.target.name(),
                self.name,
                AssociationKind::HasOne,
                descriptor.kind,
            )));
        }
        Ok(descriptor)
    }

    /// Build a new associated record with its foreign key set to the captured
    /// owner key.
    ///
    /// `params` are applied after the foreign key, so an explicit value for the
    /// foreign key field wins.
    pub fn build_with<R, F, I, K, V>(&self, reflection: &R, factory: &F, params: I) -> Result<F::Record>
    where
        R: SchemaReflection + ?Sized,
        F: RecordFactory + ?Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let descriptor = self.descriptor(reflection)?;
        tracing::debug!(
            owner = self.target.name(),
            association = self.name,
            associated = descriptor.associated.name(),
            foreign_key = descriptor.assoc_key,
            "Building associated record"
        );

        let foreign_key = (descriptor.assoc_key.to_string(), self.primary_key.clone());
        let fields = merge_fields(
            std::iter::once(foreign_key)
                .chain(params.into_iter().map(|(k, v)| (k.into(), v.into()))),
        );
        factory.construct(descriptor.associated, fields)
    }

    /// Build a new associated [`Record`], resolving through the owner's static
    /// metadata.
    pub fn build<I, K, V>(&self, params: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.build_with(&StaticReflection, &DynamicFactory, params)
    }

    /// A printable view of this handle resolved through `reflection`.
    #[must_use]
    pub fn describe<'a, R>(&'a self, reflection: &'a R) -> AssociationInfo<'a, R>
    where
        R: SchemaReflection + ?Sized,
    {
        AssociationInfo {
            target: self.target,
            name: self.name,
            reflection,
        }
    }
}

impl<T: Clone> HasOne<T> {
    /// Fetch the related value through `loader` and return the loaded handle.
    ///
    /// - An already-loaded handle is returned as-is; the loader is not called.
    /// - If resolution fails or the loader errors/cancels/panics, the outcome
    ///   is propagated and `self` is unchanged.
    pub async fn load<R, L>(&self, cx: &Cx, reflection: &R, loader: &mut L) -> Outcome<Self, Error>
    where
        R: SchemaReflection + ?Sized,
        L: AssociationLoader<T>,
    {
        if self.is_loaded() {
            tracing::trace!(
                owner = self.target.name(),
                association = self.name,
                "Association already loaded"
            );
            return Outcome::Ok(self.clone());
        }

        let descriptor = match self.descriptor(reflection) {
            Ok(d) => d,
            Err(e) => return Outcome::Err(e),
        };
        tracing::debug!(
            owner = self.target.name(),
            association = self.name,
            key = %self.primary_key,
            "Loading association"
        );

        match loader.fetch(cx, descriptor, self.primary_key.clone()).await {
            Outcome::Ok(value) => Outcome::Ok(self.clone().with_loaded(value)),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }
}

/// Borrowed view of an association resolved through a reflection, for display.
pub struct AssociationInfo<'a, R: ?Sized> {
    target: ModelId,
    name: &'static str,
    reflection: &'a R,
}

impl<R: SchemaReflection + ?Sized> fmt::Display for AssociationInfo<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(
            f,
            self.target,
            self.name,
            has_one_descriptor(self.reflection, self.target, self.name),
        )
    }
}

/// The descriptor for `(target, name)`, if it declares a has-one association.
fn has_one_descriptor<'r, R>(
    reflection: &'r R,
    target: ModelId,
    name: &str,
) -> Option<&'r RelationshipDescriptor>
where
    R: SchemaReflection + ?Sized,
{
    reflection
        .association(target, name)
        .filter(|d| d.kind == AssociationKind::HasOne)
}

/// `has_one profile (users.id -> profiles.user_id)`
fn write_summary(
    f: &mut fmt::Formatter<'_>,
    target: ModelId,
    name: &str,
    descriptor: Option<&RelationshipDescriptor>,
) -> fmt::Result {
    match descriptor {
        Some(d) => write!(
            f,
            "{} {} ({}.{} -> {}.{})",
            d.kind, name, d.owner, d.key, d.associated, d.assoc_key
        ),
        None => write!(f, "{} {} (unresolved on {})", AssociationKind::HasOne, name, target),
    }
}

impl<T> fmt::Display for HasOne<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = has_one_descriptor(&StaticReflection, self.target, self.name);
        write_summary(f, self.target, self.name, descriptor)
    }
}

impl<T: fmt::Debug> fmt::Debug for HasOne<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_loaded() { "loaded" } else { "not_loaded" };
        let mut s = f.debug_struct("HasOne");
        s.field("field", &self.name).field("owner", &self.target.name());
        match has_one_descriptor(&StaticReflection, self.target, self.name) {
            Some(d) => {
                s.field("associated", &d.associated.name())
                    .field("key", &d.key)
                    .field("assoc_key", &d.assoc_key);
            }
            None => {
                s.field("descriptor", &"unresolved");
            }
        }
        s.field("state", &state)
            .field("primary_key", &self.primary_key)
            .field("loaded", &self.loaded.as_ref().into_option())
            .finish()
    }
}

impl<T: Serialize> Serialize for HasOne<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.loaded {
            Loaded::Loaded(Some(value)) => value.serialize(serializer),
            Loaded::Loaded(None) | Loaded::NotLoaded => serializer.serialize_none(),
        }
    }
}
