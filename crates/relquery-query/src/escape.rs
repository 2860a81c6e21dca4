//! Validation of field expressions.
//!
//! [`escape`] accepts exactly three shapes:
//!
//! 1. `var.field`, where `var` is bound and `field` is a plain identifier
//! 2. a tuple whose elements are all of shape 1
//! 3. a list whose elements are all of shape 1
//!
//! Everything else fails with the same [`InvalidExpressionError`], whatever the
//! reason or depth of the rejection.

use crate::bindings::Bindings;
use crate::expr::Expr;
use relquery_core::{Error, InvalidExpressionError, Result, is_plain_identifier};
use std::fmt;

/// A validated `var.field` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    binding: usize,
    var: String,
    field: String,
}

impl FieldRef {
    /// Create a reference to `field` of the variable bound at position `binding`.
    ///
    /// Only [`escape`] hands out references, so every one names a bound variable.
    pub(crate) fn new(binding: usize, var: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            binding,
            var: var.into(),
            field: field.into(),
        }
    }

    /// Position of the variable in the [`Bindings`] it was validated against.
    pub fn binding(&self) -> usize {
        self.binding
    }

    /// The bound variable name.
    pub fn var(&self) -> &str {
        &self.var
    }

    /// The field name.
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.var, self.field)
    }
}

/// Result of a successful [`escape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedExpression {
    /// A single `var.field`
    Single(FieldRef),
    /// A tuple of references, in source order
    Tuple(Vec<FieldRef>),
    /// A list of references, in source order
    List(Vec<FieldRef>),
}

impl ValidatedExpression {
    /// All references in source order.
    pub fn fields(&self) -> &[FieldRef] {
        match self {
            ValidatedExpression::Single(field) => std::slice::from_ref(field),
            ValidatedExpression::Tuple(fields) | ValidatedExpression::List(fields) => fields,
        }
    }

    /// Number of references.
    pub fn len(&self) -> usize {
        self.fields().len()
    }

    /// Check if there are no references (an empty tuple or list).
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn is_single(&self) -> bool {
        matches!(self, ValidatedExpression::Single(_))
    }
}

fn write_refs(f: &mut fmt::Formatter<'_>, fields: &[FieldRef], open: &str, close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{field}")?;
    }
    f.write_str(close)
}

impl fmt::Display for ValidatedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatedExpression::Single(field) => write!(f, "{field}"),
            ValidatedExpression::Tuple(fields) => write_refs(f, fields, "(", ")"),
            ValidatedExpression::List(fields) => write_refs(f, fields, "[", "]"),
        }
    }
}

/// Validate a field expression against the variables bound by the query.
///
/// # Example
///
/// ```ignore
/// let bindings = Bindings::new().bind("p", ModelId::of::<Post>());
///
/// let single = escape(&Expr::dot("p", "title"), &bindings)?;
/// assert_eq!(single.to_string(), "p.title");
///
/// let pair = escape(&Expr::tuple([Expr::dot("p", "id"), Expr::dot("p", "title")]), &bindings)?;
/// assert_eq!(pair.len(), 2);
///
/// assert!(escape(&Expr::dot("q", "title"), &bindings).is_err());
/// ```
#[tracing::instrument(level = "trace", skip(bindings))]
pub fn escape(expr: &Expr, bindings: &Bindings) -> Result<ValidatedExpression> {
    match expr {
        Expr::Tuple(items) => escape_all(items, bindings).map(ValidatedExpression::Tuple),
        Expr::List(items) => escape_all(items, bindings).map(ValidatedExpression::List),
        other => escape_field(other, bindings).map(ValidatedExpression::Single),
    }
}

fn escape_all(items: &[Expr], bindings: &Bindings) -> Result<Vec<FieldRef>> {
    items.iter().map(|item| escape_field(item, bindings)).collect()
}

fn escape_field(expr: &Expr, bindings: &Bindings) -> Result<FieldRef> {
    let Expr::Dot { base, member } = expr else {
        return Err(reject("not a dotted access"));
    };
    let Expr::Ident(var) = base.as_ref() else {
        return Err(reject("left side is not a variable"));
    };
    let Some(binding) = bindings.index_of(var) else {
        return Err(reject("variable is not bound"));
    };
    let Expr::Ident(field) = member.as_ref() else {
        return Err(reject("right side is not a field"));
    };
    if !is_plain_identifier(field) {
        return Err(reject("field is not a plain identifier"));
    }
    Ok(FieldRef {
        binding,
        var: var.clone(),
        field: field.clone(),
    })
}

fn reject(reason: &'static str) -> Error {
    tracing::trace!(reason, "Rejected field expression");
    Error::Expression(InvalidExpressionError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relquery_core::ModelId;

    fn bindings() -> Bindings {
        Bindings::new()
            .bind("x", ModelId::named("posts"))
            .bind("c", ModelId::named("comments"))
    }

    fn assert_rejected(expr: &Expr) {
        match escape(expr, &bindings()) {
            Err(Error::Expression(e)) => assert_eq!(
                e.to_string(),
                "only dotted expressions of bound vars are allowed `bound.field`"
            ),
            other => panic!("expected rejection of {expr}, got {other:?}"),
        }
    }

    #[test]
    fn test_single_bound_field() {
        let escaped = escape(&Expr::dot("x", "title"), &bindings()).unwrap();
        assert_eq!(escaped, ValidatedExpression::Single(FieldRef::new(0, "x", "title")));
        assert!(escaped.is_single());
        assert_eq!(escaped.to_string(), "x.title");
    }

    #[test]
    fn test_binding_index_is_recorded() {
        let escaped = escape(&Expr::dot("c", "body"), &bindings()).unwrap();
        let field = &escaped.fields()[0];
        assert_eq!(field.binding(), 1);
        assert_eq!(field.var(), "c");
        assert_eq!(field.field(), "body");
    }

    #[test]
    fn test_unbound_variable_rejected() {
        assert_rejected(&Expr::dot("y", "title"));
    }

    #[test]
    fn test_non_dotted_rejected() {
        assert_rejected(&Expr::lit(1_i64));
        assert_rejected(&Expr::lit("title"));
        assert_rejected(&Expr::ident("x"));
        assert_rejected(&Expr::binary(Expr::dot("x", "y"), "+", Expr::dot("x", "z")));
        assert_rejected(&Expr::apply("lower", [Expr::dot("x", "y")]));
    }

    #[test]
    fn test_non_field_member_rejected() {
        assert_rejected(&Expr::access(Expr::ident("x"), Expr::lit(1_i64)));
        assert_rejected(&Expr::access(
            Expr::ident("x"),
            Expr::apply("f", [Expr::ident("y")]),
        ));
        assert_rejected(&Expr::dot("x", "not plain"));
        assert_rejected(&Expr::dot("x", "1st"));
    }

    #[test]
    fn test_dotted_chain_rejected() {
        assert_rejected(&Expr::access(Expr::dot("x", "a"), Expr::ident("b")));
    }

    #[test]
    fn test_tuple_of_fields() {
        let expr = Expr::tuple([Expr::dot("x", "y"), Expr::dot("x", "z")]);
        let escaped = escape(&expr, &bindings()).unwrap();
        assert_eq!(
            escaped,
            ValidatedExpression::Tuple(vec![FieldRef::new(0, "x", "y"), FieldRef::new(0, "x", "z")])
        );
        assert_eq!(escaped.to_string(), "(x.y, x.z)");
    }

    #[test]
    fn test_list_mirrors_tuple() {
        let expr = Expr::list([Expr::dot("x", "y"), Expr::dot("c", "z")]);
        let escaped = escape(&expr, &bindings()).unwrap();
        assert_eq!(
            escaped,
            ValidatedExpression::List(vec![FieldRef::new(0, "x", "y"), FieldRef::new(1, "c", "z")])
        );
        assert_eq!(escaped.to_string(), "[x.y, c.z]");
        assert_eq!(escaped.len(), 2);
    }

    #[test]
    fn test_tuple_with_literal_rejected() {
        assert_rejected(&Expr::tuple([Expr::dot("x", "y"), Expr::lit(1_i64)]));
        assert_rejected(&Expr::list([Expr::lit(1_i64), Expr::dot("x", "y")]));
    }

    #[test]
    fn test_nested_composites_rejected() {
        assert_rejected(&Expr::tuple([
            Expr::dot("x", "y"),
            Expr::tuple([Expr::dot("x", "z")]),
        ]));
        assert_rejected(&Expr::list([Expr::tuple([Expr::dot("x", "y")])]));
        assert_rejected(&Expr::tuple([Expr::list([Expr::dot("x", "y")])]));
    }

    #[test]
    fn test_empty_composites_accepted() {
        let tuple = escape(&Expr::tuple([]), &bindings()).unwrap();
        assert_eq!(tuple, ValidatedExpression::Tuple(vec![]));
        assert!(tuple.is_empty());
        let list = escape(&Expr::list([]), &bindings()).unwrap();
        assert_eq!(list.to_string(), "[]");
    }

    #[test]
    fn test_escape_is_deterministic() {
        let expr = Expr::tuple([Expr::dot("x", "y"), Expr::dot("c", "z")]);
        let first = escape(&expr, &bindings()).unwrap();
        let second = escape(&expr, &bindings()).unwrap();
        assert_eq!(first, second);

        let bad = Expr::dot("q", "y");
        assert_eq!(
            escape(&bad, &bindings()).unwrap_err().to_string(),
            escape(&bad, &bindings()).unwrap_err().to_string()
        );
    }
}
