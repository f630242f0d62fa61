//! Document paths: null-safe reads and auto-vivifying writes.
//!
//! A [`Path`] is a non-empty ordered sequence of segments (map keys and list
//! indices) identifying one location inside a [`Value`] document. Reading
//! through a path never fails: any missing or wrong-shaped intermediate makes
//! the whole read resolve to absence. Writing creates missing intermediate
//! containers of the kind implied by the next segment, and fails only when an
//! existing intermediate has an incompatible shape.

use std::collections::HashMap;
use std::fmt;

use fieldstack_model::{PathSegment, Value};
use tracing::trace;

/// Errors produced by path construction or writes.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// A path must contain at least one segment.
    #[error("path must contain at least one segment")]
    Empty,
    /// An existing intermediate value has the wrong shape for the next segment.
    #[error("type mismatch at `{segment}`: expected {expected}, found {found}")]
    ShapeMismatch {
        /// The segment that could not be dereferenced.
        segment: String,
        /// The container kind the segment requires.
        expected: &'static str,
        /// The kind of the value actually present.
        found: &'static str,
    },
    /// The node has no setter.
    #[error("node is read-only: no setter was attached at construction")]
    ReadOnly,
}

/// A non-empty route through a nested document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Builds a path from an ordered sequence of segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] if the sequence contains no segments.
    /// Misuse is rejected here, at construction, rather than surfacing as
    /// silent null propagation during evaluation.
    pub fn new<I>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        let segments: Vec<PathSegment> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self { segments })
    }

    /// The ordered segments of this path.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Walks the path against a document, returning the value at the terminal
    /// location.
    ///
    /// Absence is uniform: a missing map key, an out-of-range index, a
    /// wrong-shaped intermediate, and an explicit `Null` at the terminal all
    /// resolve to `None`. This never fails and never panics.
    #[must_use]
    pub fn resolve<'a>(&self, target: &'a Value) -> Option<&'a Value> {
        let mut current = target;
        for segment in &self.segments {
            current = match segment {
                PathSegment::Key(key) => current.as_map()?.get(key)?,
                PathSegment::Index(idx) => current.as_list()?.get(*idx)?,
            };
        }
        if current.is_null() { None } else { Some(current) }
    }

    /// Writes a value at the terminal location, creating missing intermediate
    /// containers along the way.
    ///
    /// A missing (or `Null`) intermediate becomes an empty map for a key
    /// segment and an empty list for an index segment; lists are padded with
    /// `Null` up to the written index. The terminal value is overwritten
    /// unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::ShapeMismatch`] when an existing intermediate
    /// value is incompatible with the next segment's container kind.
    pub fn write(&self, target: &mut Value, value: Value) -> Result<(), PathError> {
        write_segments(&self.segments, target, value)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) if i > 0 => write!(f, ".{name}")?,
                _ => write!(f, "{segment}")?,
            }
        }
        Ok(())
    }
}

fn write_segments(
    segments: &[PathSegment],
    current: &mut Value,
    value: Value,
) -> Result<(), PathError> {
    match segments {
        [] => {
            *current = value;
            Ok(())
        }
        [segment, rest @ ..] => {
            let slot = enter(current, segment)?;
            write_segments(rest, slot, value)
        }
    }
}

/// Dereferences one segment for writing, vivifying the container if the
/// current value is `Null`.
fn enter<'a>(current: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value, PathError> {
    match segment {
        PathSegment::Key(key) => {
            if current.is_null() {
                trace!(segment = %segment, "creating map for missing intermediate");
                *current = Value::Map(HashMap::new());
            }
            let found = current.type_name();
            let Some(map) = current.as_map_mut() else {
                return Err(PathError::ShapeMismatch {
                    segment: segment.to_string(),
                    expected: "map",
                    found,
                });
            };
            Ok(map.entry(key.clone()).or_insert(Value::Null))
        }
        PathSegment::Index(idx) => {
            if current.is_null() {
                trace!(segment = %segment, "creating list for missing intermediate");
                *current = Value::List(Vec::new());
            }
            let found = current.type_name();
            let Some(list) = current.as_list_mut() else {
                return Err(PathError::ShapeMismatch {
                    segment: segment.to_string(),
                    expected: "list",
                    found,
                });
            };
            if list.len() <= *idx {
                list.resize(idx + 1, Value::Null);
            }
            Ok(&mut list[*idx])
        }
    }
}
