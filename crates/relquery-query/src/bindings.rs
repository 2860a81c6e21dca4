//! Variables bound by the enclosing query.

use relquery_core::ModelId;

/// Ordered mapping from bound-variable name to the model it ranges over.
///
/// The position of a binding is its index, which [`FieldRef`](crate::FieldRef)
/// records as the normalized variable reference.
///
/// # Example
///
/// ```ignore
/// let bindings = Bindings::new()
///     .bind("u", ModelId::of::<User>())
///     .bind("p", ModelId::of::<Profile>());
/// assert_eq!(bindings.index_of("p"), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<(String, ModelId)>,
}

impl Bindings {
    /// Create an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `model`.
    ///
    /// Re-binding an existing name replaces its model and keeps its position.
    pub fn bind(mut self, name: impl Into<String>, model: ModelId) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(bound, _)| *bound == name) {
            Some(slot) => slot.1 = model,
            None => self.entries.push((name, model)),
        }
        self
    }

    /// Position of `name`, if bound.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(bound, _)| bound == name)
    }

    /// Model bound to `name`, if any.
    pub fn model_of(&self, name: &str) -> Option<ModelId> {
        self.entries
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, model)| *model)
    }

    /// Check if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Get the binding at `index`.
    pub fn get(&self, index: usize) -> Option<(&str, ModelId)> {
        self.entries
            .get(index)
            .map(|(name, model)| (name.as_str(), *model))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ModelId)> {
        self.entries
            .iter()
            .map(|(name, model)| (name.as_str(), *model))
    }
}

impl<K: Into<String>> FromIterator<(K, ModelId)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, ModelId)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Bindings::new(), |bindings, (name, model)| bindings.bind(name, model))
    }
}
