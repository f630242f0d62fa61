//! Path-built leaf accessors.
//!
//! A [`Field`] is the addressable starting point of most expressions: its
//! getter walks a document path with null-safe navigation and converts the
//! terminal value to `T`, and its setter writes back through the same path,
//! creating missing intermediate containers. Getter, setter, and metadata are
//! built together from the path at construction.

use std::marker::PhantomData;
use std::sync::Arc;

use fieldstack_model::{FieldType, Metadata, PathSegment, Value};

use crate::accessor::{ContextAccessor, Getter, Setter};
use crate::function::Function;
use crate::path::{Path, PathError};

/// A typed accessor for one document path.
///
/// A value of the wrong shape at the path reads as absence, consistent with
/// the null-propagation rule everywhere else.
#[derive(Debug, Clone)]
pub struct Field<T: FieldType> {
    path: Path,
    metadata: Arc<Metadata>,
    _type: PhantomData<fn() -> T>,
}

impl<T: FieldType> Field<T> {
    /// Builds a field accessor from an already-validated path.
    #[must_use]
    pub fn new(path: Path) -> Self {
        let metadata = Arc::new(Metadata::field(path.segments().to_vec()));
        Self {
            path,
            metadata,
            _type: PhantomData,
        }
    }

    /// Builds a field accessor from path segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] if no segments are given.
    pub fn at<I>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        Ok(Self::new(Path::new(segments)?))
    }

    /// The path this field navigates.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: FieldType> ContextAccessor<T> for Field<T> {
    fn metadata(&self) -> Arc<Metadata> {
        self.metadata.clone()
    }

    fn getter(&self) -> Getter<T> {
        let path = self.path.clone();
        Arc::new(move |target, _ctx| path.resolve(target).and_then(T::from_value))
    }

    fn setter(&self) -> Option<Setter<T>> {
        let path = self.path.clone();
        Some(Arc::new(move |target, _ctx, value| {
            path.write(target, value.map_or(Value::Null, FieldType::into_value))
        }))
    }
}

/// A path-built field lifted straight into the combinator algebra.
///
/// # Errors
///
/// Returns [`PathError::Empty`] if no segments are given.
pub fn field<T, I>(segments: I) -> Result<Function<T>, PathError>
where
    T: FieldType,
    I: IntoIterator,
    I::Item: Into<PathSegment>,
{
    Ok(Function::from_accessor(&Field::<T>::at(segments)?))
}
