//! Record construction.
//!
//! Association handles build new associated records through a
//! [`RecordFactory`]: the handle supplies the model and the field/value pairs
//! (foreign key first, then caller overrides) and the factory decides how the
//! model is represented.

use crate::error::{Error, Result, SchemaError};
use crate::schema::{ModelId, Schema};
use crate::value::Value;
use std::marker::PhantomData;

/// Collapse field/value pairs so each field appears once.
///
/// A field keeps the position of its first occurrence and the value of its
/// last one.
pub fn merge_fields<I>(pairs: I) -> Vec<(String, Value)>
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut merged: Vec<(String, Value)> = Vec::new();
    for (field, value) in pairs {
        match merged.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => merged.push((field, value)),
        }
    }
    merged
}

/// A dynamically-shaped record: a model plus ordered field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: ModelId,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record of `model`.
    #[must_use]
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            fields: Vec::new(),
        }
    }

    /// The record's model.
    #[must_use]
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Get a field value by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Set a field, replacing any previous value in place.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// All fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Number of fields set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the record, returning its fields.
    #[must_use]
    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }
}

/// Instantiates a model from field/value pairs.
pub trait RecordFactory {
    /// The representation this factory produces.
    type Record;

    /// Construct a record of `model`.
    ///
    /// `fields` holds each field at most once.
    fn construct(&self, model: ModelId, fields: Vec<(String, Value)>) -> Result<Self::Record>;
}

/// Builds [`Record`]s for any model.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicFactory;

impl RecordFactory for DynamicFactory {
    type Record = Record;

    fn construct(&self, model: ModelId, fields: Vec<(String, Value)>) -> Result<Record> {
        Ok(Record {
            model,
            fields: merge_fields(fields),
        })
    }
}

/// Typed models that can be instantiated from field/value pairs.
pub trait FromFields: Schema + Sized {
    /// Build the model, starting from its defaults for fields not given.
    fn from_fields(fields: Vec<(String, Value)>) -> Result<Self>;
}

/// Builds one typed model, refusing any other.
pub struct TypedFactory<M> {
    _model: PhantomData<fn() -> M>,
}

impl<M> TypedFactory<M> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<M> Default for TypedFactory<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: FromFields> RecordFactory for TypedFactory<M> {
    type Record = M;

    fn construct(&self, model: ModelId, fields: Vec<(String, Value)>) -> Result<M> {
        if model != ModelId::of::<M>() {
            return Err(Error::Schema(SchemaError::unknown_model(
                M::MODEL,
                model.name(),
            )));
        }
        M::from_fields(fields)
    }
}
