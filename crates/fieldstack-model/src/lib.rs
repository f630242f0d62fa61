//! Data model for Fieldstack expressions.
//!
//! This crate holds the pure data types shared by the expression engine and by
//! anything that inspects built expressions:
//!
//! - [`Value`]: the tagged-union document value accessors evaluate against.
//! - [`FieldType`]: conversion between typed expression leaves and [`Value`].
//! - [`Metadata`] / [`Operator`] / [`PathSegment`]: the immutable description
//!   tree mirroring the shape of every built expression.
//!
//! Nothing in this crate evaluates anything; evaluation lives in
//! `fieldstack-core`.

pub mod metadata;
pub mod value;

pub use metadata::{Metadata, Operator, PathSegment};
pub use value::{FieldType, Value};
