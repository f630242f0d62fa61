//! The accessor capability and the instrumentation seam.
//!
//! Every expression node, whatever its concrete kind, is used through the same
//! shape: a getter from `(document, context)` to an optional value, an
//! optional setter, and an attached metadata tree. [`ContextAccessor`] is that
//! polymorphism backbone; [`Function`](crate::Function) lifts any implementor
//! into the combinator algebra.
//!
//! Instrumentation is a decorator composed once at node construction, not an
//! ambient interception layer: [`Interceptor`] observes get/set calls around
//! the raw closures without altering evaluation results.

use std::sync::Arc;

use fieldstack_model::{FieldType, Metadata, Value};
use tracing::debug;

use crate::context::Context;
use crate::path::PathError;

/// Getter closure: evaluates a node against a document and context.
pub type Getter<T> = Arc<dyn Fn(&Value, &Context) -> Option<T> + Send + Sync>;

/// Setter closure: writes a value (or absence) through a node into a document.
pub type Setter<T> =
    Arc<dyn Fn(&mut Value, &Context, Option<T>) -> Result<(), PathError> + Send + Sync>;

/// The common shape every expression node implements.
///
/// The setter is optional: only addressable nodes (those built directly from a
/// document path) carry one; combinator-derived nodes are get-only.
pub trait ContextAccessor<T: FieldType> {
    /// The metadata describing this accessor.
    fn metadata(&self) -> Arc<Metadata>;

    /// The getter closure.
    fn getter(&self) -> Getter<T>;

    /// The setter closure, when this accessor is addressable.
    fn setter(&self) -> Option<Setter<T>> {
        None
    }
}

/// Observer invoked around every `get`/`set` call of the node it is attached
/// to.
///
/// Hooks are an observability seam for cross-cutting concerns (logging,
/// counting); they receive the node's metadata and must not assume anything
/// about evaluation order across nodes they are not attached to.
pub trait Interceptor: Send + Sync {
    /// Called before the raw getter runs.
    fn on_get(&self, metadata: &Metadata) {
        let _ = metadata;
    }

    /// Called before the raw setter runs.
    fn on_set(&self, metadata: &Metadata) {
        let _ = metadata;
    }
}

/// Wraps a getter so `hook` observes every invocation.
pub fn intercept_getter<T: 'static>(
    metadata: Arc<Metadata>,
    hook: Arc<dyn Interceptor>,
    inner: Getter<T>,
) -> Getter<T> {
    Arc::new(move |target, ctx| {
        hook.on_get(&metadata);
        inner(target, ctx)
    })
}

/// Wraps a setter so `hook` observes every invocation.
pub fn intercept_setter<T: 'static>(
    metadata: Arc<Metadata>,
    hook: Arc<dyn Interceptor>,
    inner: Setter<T>,
) -> Setter<T> {
    Arc::new(move |target, ctx, value| {
        hook.on_set(&metadata);
        inner(target, ctx, value)
    })
}

/// Interceptor that logs every get/set through `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingInterceptor;

impl Interceptor for TracingInterceptor {
    fn on_get(&self, metadata: &Metadata) {
        debug!(expression = %metadata, "get");
    }

    fn on_set(&self, metadata: &Metadata) {
        debug!(expression = %metadata, "set");
    }
}
