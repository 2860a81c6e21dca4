//! Parsed query expressions.
//!
//! This is the generic node form produced by the query front end. It is not
//! restricted in any way; [`escape`](crate::escape) decides what is accepted.

use relquery_core::Value;
use std::fmt;

/// A node of a parsed query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Value),

    /// Bare identifier (a variable or a field name)
    Ident(String),

    /// Dotted access `base.member`
    Dot {
        base: Box<Expr>,
        member: Box<Expr>,
    },

    /// Tuple literal `(a, b, ...)`
    Tuple(Vec<Expr>),

    /// List literal `[a, b, ...]`
    List(Vec<Expr>),

    /// Operator or function application (e.g., `a + b`, `lower(a)`)
    Apply { op: String, args: Vec<Expr> },
}

impl Expr {
    /// Create a literal.
    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Create a bare identifier.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// Create the dotted access `var.field`.
    pub fn dot(var: impl Into<String>, field: impl Into<String>) -> Self {
        Expr::access(Expr::ident(var), Expr::ident(field))
    }

    /// Create a dotted access with arbitrary sides.
    pub fn access(base: Expr, member: Expr) -> Self {
        Expr::Dot {
            base: Box::new(base),
            member: Box::new(member),
        }
    }

    /// Create a tuple literal.
    pub fn tuple(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Tuple(items.into_iter().collect())
    }

    /// Create a list literal.
    pub fn list(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::List(items.into_iter().collect())
    }

    /// Create an operator application.
    pub fn apply(op: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Apply {
            op: op.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Create a binary operator application `left op right`.
    pub fn binary(left: Expr, op: impl Into<String>, right: Expr) -> Self {
        Expr::apply(op, [left, right])
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Expr], open: &str, close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Dot { base, member } => write!(f, "{base}.{member}"),
            Expr::Tuple(items) => write_seq(f, items, "(", ")"),
            Expr::List(items) => write_seq(f, items, "[", "]"),
            Expr::Apply { op, args } => {
                // Symbolic binary operators print infix
                let symbolic = !op.chars().any(|c| c.is_alphanumeric() || c == '_');
                match args.as_slice() {
                    [left, right] if symbolic => write!(f, "{left} {op} {right}"),
                    _ => {
                        f.write_str(op)?;
                        write_seq(f, args, "(", ")")
                    }
                }
            }
        }
    }
}
