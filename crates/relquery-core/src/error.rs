//! Error types for association and query-expression operations.

use crate::relationship::AssociationKind;
use std::fmt;

/// The primary error type for all relquery operations.
#[derive(Debug)]
pub enum Error {
    /// A query field expression fell outside the accepted grammar
    Expression(InvalidExpressionError),
    /// An association was read before it was fetched
    NotLoaded(AssociationNotLoadedError),
    /// Relationship metadata could not be resolved
    Schema(SchemaError),
    /// Value conversion errors
    Type(TypeError),
    /// Custom error with message
    Custom(String),
}

/// Raised when a field expression is not a dotted reference to a bound variable.
///
/// The message is fixed and identical for every rejection site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvalidExpressionError;

impl InvalidExpressionError {
    /// The diagnostic reported for any rejected expression.
    pub const MESSAGE: &'static str =
        "only dotted expressions of bound vars are allowed `bound.field`";

    /// Get the diagnostic message.
    pub const fn message(&self) -> &'static str {
        Self::MESSAGE
    }
}

/// Raised when the value of an unloaded association is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationNotLoadedError {
    /// Kind of the association (`has_one`, ...)
    pub kind: AssociationKind,
    /// Model that declares the association
    pub owner: &'static str,
    /// Association field name
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// No association with that name is declared on the model
    AssociationNotFound,
    /// A record factory cannot construct the requested model
    UnknownModel,
    /// The declared association is of a different kind than the handle
    KindMismatch,
}

impl SchemaError {
    /// Create an error for a `(model, field)` pair that has no descriptor.
    pub fn association_not_found(owner: &str, field: &str) -> Self {
        Self {
            kind: SchemaErrorKind::AssociationNotFound,
            message: format!("no association '{field}' declared on {owner}"),
        }
    }

    /// Create an error for a descriptor whose kind does not match the handle.
    pub fn kind_mismatch(
        owner: &str,
        field: &str,
        expected: AssociationKind,
        actual: AssociationKind,
    ) -> Self {
        Self {
            kind: SchemaErrorKind::KindMismatch,
            message: format!("association '{field}' on {owner} is {actual}, expected {expected}"),
        }
    }

    /// Create an error for a factory asked to build a model it does not know.
    pub fn unknown_model(expected: &str, actual: &str) -> Self {
        Self {
            kind: SchemaErrorKind::UnknownModel,
            message: format!("cannot construct {actual}: factory builds {expected}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub field: Option<String>,
}

impl Error {
    /// Is this an `AssociationNotLoadedError`?
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, Error::NotLoaded(_))
    }

    /// Is this an `InvalidExpressionError`?
    pub fn is_invalid_expression(&self) -> bool {
        matches!(self, Error::Expression(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Expression(e) => write!(f, "{e}"),
            Error::NotLoaded(e) => write!(f, "{e}"),
            Error::Schema(e) => write!(f, "Schema error: {}", e.message),
            Error::Type(e) => write!(f, "Type error: {e}"),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for InvalidExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::MESSAGE)
    }
}

impl std::error::Error for InvalidExpressionError {}

impl fmt::Display for AssociationNotLoadedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "association {} is not loaded on {} ({})",
            self.name, self.owner, self.kind
        )
    }
}

impl std::error::Error for AssociationNotLoadedError {}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(
                f,
                "expected {} for field '{}', found {}",
                self.expected, field, self.actual
            )
        } else {
            write!(f, "expected {}, found {}", self.expected, self.actual)
        }
    }
}

impl From<InvalidExpressionError> for Error {
    fn from(err: InvalidExpressionError) -> Self {
        Error::Expression(err)
    }
}

impl From<AssociationNotLoadedError> for Error {
    fn from(err: AssociationNotLoadedError) -> Self {
        Error::NotLoaded(err)
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

/// Result type alias for relquery operations.
pub type Result<T> = std::result::Result<T, Error>;
