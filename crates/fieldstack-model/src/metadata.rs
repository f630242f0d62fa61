//! Expression-shape metadata.
//!
//! Every executable node carries a `Metadata` tree describing the operation it
//! performs, built by the same combinator call that built the node. Metadata is
//! pure data: it stores its children in the order given, never evaluates
//! anything, and is never mutated after construction. Sub-trees are shared by
//! `Arc` across parent expressions.
//!
//! Downstream consumers (debug printers, serializers, query translators) only
//! need read access to the variants; the operator tags are opaque to this
//! module and carry a `Display` form for rendering.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// One segment of a document path: a map key or a list index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named map entry.
    Key(String),
    /// A list index dereference.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => write!(f, "{name}"),
            Self::Index(idx) => write!(f, "[{idx}]"),
        }
    }
}

/// Renders a sequence of segments as `root.child[2].leaf`.
pub(crate) fn fmt_segments(segments: &[PathSegment], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            PathSegment::Key(name) => {
                if i > 0 {
                    write!(f, ".{name}")?;
                } else {
                    write!(f, "{name}")?;
                }
            }
            PathSegment::Index(idx) => write!(f, "[{idx}]")?,
        }
    }
    Ok(())
}

/// Operator tag attached by the combinator that created a metadata node.
///
/// Tags are opaque identifiers: the metadata layer carries them without
/// interpreting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equality test.
    Eq,
    /// Inequality test.
    NotEq,
    /// Null test.
    IsNull,
    /// Non-null test.
    IsNotNull,
    /// All of the listed values match.
    MatchAll,
    /// At least one of the listed values matches.
    MatchAny,
    /// None of the listed values match.
    NoneMatch,
    /// Logical conjunction.
    And,
    /// Logical disjunction.
    Or,
    /// Logical negation.
    Not,
    /// Truthiness test.
    IsTruthy,
    /// Falsiness test.
    IsFalsy,
    /// Value-mapping transform.
    MapTo,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::NotEq => write!(f, "!="),
            Self::IsNull => write!(f, "is null"),
            Self::IsNotNull => write!(f, "is not null"),
            Self::MatchAll => write!(f, "match all"),
            Self::MatchAny => write!(f, "match any"),
            Self::NoneMatch => write!(f, "none match"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Not => write!(f, "not"),
            Self::IsTruthy => write!(f, "is truthy"),
            Self::IsFalsy => write!(f, "is falsy"),
            Self::MapTo => write!(f, "map to"),
        }
    }
}

/// Immutable description of one expression node.
///
/// Structurally isomorphic to the composition history of the executable node it
/// is attached to. Construction cannot fail.
#[derive(Debug, Clone)]
pub enum Metadata {
    /// A constant literal.
    Value(Value),
    /// A path-built field leaf.
    Field(Vec<PathSegment>),
    /// A unary operation over one operand.
    Unary {
        /// Metadata of the operand.
        operand: Arc<Metadata>,
        /// Operator tag.
        op: Operator,
    },
    /// A binary operation over two operands.
    Binary {
        /// Metadata of the left operand.
        left: Arc<Metadata>,
        /// Operator tag.
        op: Operator,
        /// Metadata of the right operand.
        right: Arc<Metadata>,
    },
    /// An ordered sequence of operand metadata, used by multi-value combinators.
    Iterable(Vec<Arc<Metadata>>),
    /// Identifier of an arbitrary mapping function.
    FunctionRef(String),
}

impl Metadata {
    /// Wraps a literal.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Describes a path-built field leaf.
    #[must_use]
    pub fn field(segments: Vec<PathSegment>) -> Self {
        Self::Field(segments)
    }

    /// Describes a unary operation.
    #[must_use]
    pub fn unary(operand: Arc<Metadata>, op: Operator) -> Self {
        Self::Unary { operand, op }
    }

    /// Describes a binary operation.
    #[must_use]
    pub fn binary(left: Arc<Metadata>, op: Operator, right: Arc<Metadata>) -> Self {
        Self::Binary { left, op, right }
    }

    /// Describes an ordered collection of operands.
    #[must_use]
    pub fn iterable(items: Vec<Arc<Metadata>>) -> Self {
        Self::Iterable(items)
    }

    /// References a mapping function by identifier.
    pub fn function_ref(ident: impl Into<String>) -> Self {
        Self::FunctionRef(ident.into())
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Field(segments) => fmt_segments(segments, f),
            Self::Unary { operand, op } => write!(f, "{operand} {op}"),
            Self::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
            Self::Iterable(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::FunctionRef(ident) => write!(f, "{ident}"),
        }
    }
}
