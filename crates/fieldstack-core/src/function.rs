//! The generic expression node and its combinator algebra.
//!
//! A [`Function`] pairs an executable getter (and optional setter) with the
//! [`Metadata`] describing it. Both halves are always built together by the
//! same combinator call, so a node's metadata is structurally isomorphic to
//! its composition history: there is never a node whose metadata describes one
//! operation while its getter performs another.
//!
//! Nodes are immutable after construction and cheap to clone; combinators
//! return brand-new nodes sharing their children by `Arc`.

use std::fmt;
use std::sync::Arc;

use fieldstack_model::{FieldType, Metadata, Operator, Value};

use crate::accessor::{
    ContextAccessor, Getter, Interceptor, Setter, intercept_getter, intercept_setter,
};
use crate::boolean::BooleanFunction;
use crate::context::Context;
use crate::path::PathError;

/// An executable expression node over values of type `T`.
pub struct Function<T: FieldType> {
    metadata: Arc<Metadata>,
    getter: Getter<T>,
    setter: Option<Setter<T>>,
}

impl<T: FieldType> Clone for Function<T> {
    fn clone(&self) -> Self {
        Self {
            metadata: self.metadata.clone(),
            getter: self.getter.clone(),
            setter: self.setter.clone(),
        }
    }
}

impl<T: FieldType> fmt::Debug for Function<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// A combinator argument: either a literal or another node.
///
/// The decision is made once, at the call boundary, instead of through
/// repeated dynamic type tests inside each combinator.
pub enum Operand<T: FieldType> {
    /// A constant literal.
    Value(T),
    /// A previously built node, evaluated against the same document and
    /// context as the left side.
    Node(Function<T>),
}

impl<T: FieldType> Clone for Operand<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::Node(n) => Self::Node(n.clone()),
        }
    }
}

impl<T: FieldType> fmt::Debug for Operand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Operand::Value"),
            Self::Node(n) => write!(f, "Operand::Node({})", n.metadata),
        }
    }
}

impl<T: FieldType> From<T> for Operand<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: FieldType> From<Function<T>> for Operand<T> {
    fn from(node: Function<T>) -> Self {
        Self::Node(node)
    }
}

impl<T: FieldType> From<&Function<T>> for Operand<T> {
    fn from(node: &Function<T>) -> Self {
        Self::Node(node.clone())
    }
}

impl<T: FieldType> Operand<T> {
    /// Metadata describing this operand: the literal wrapped as a value node,
    /// or the node's own metadata.
    #[must_use]
    pub fn metadata(&self) -> Arc<Metadata> {
        match self {
            Self::Value(v) => Arc::new(Metadata::Value(v.clone().into_value())),
            Self::Node(n) => n.metadata.clone(),
        }
    }

    /// Evaluates the operand: a literal yields itself without touching the
    /// document; a node runs its getter.
    #[must_use]
    pub fn resolve(&self, target: &Value, ctx: &Context) -> Option<T> {
        match self {
            Self::Value(v) => Some(v.clone()),
            Self::Node(n) => n.get(target, ctx),
        }
    }
}

impl<T: FieldType> Function<T> {
    /// Builds a get-only node from metadata and a getter.
    pub fn new(metadata: Metadata, getter: Getter<T>) -> Self {
        Self {
            metadata: Arc::new(metadata),
            getter,
            setter: None,
        }
    }

    /// Builds an addressable node carrying both a getter and a setter.
    pub fn with_setter(metadata: Metadata, getter: Getter<T>, setter: Setter<T>) -> Self {
        Self {
            metadata: Arc::new(metadata),
            getter,
            setter: Some(setter),
        }
    }

    /// Builds a setter-only node; its getter always yields absence.
    pub fn consumer(metadata: Metadata, setter: Setter<T>) -> Self {
        Self {
            metadata: Arc::new(metadata),
            getter: Arc::new(|_, _| None),
            setter: Some(setter),
        }
    }

    /// Lifts any accessor into the combinator algebra.
    pub fn from_accessor(accessor: &impl ContextAccessor<T>) -> Self {
        Self {
            metadata: accessor.metadata(),
            getter: accessor.getter(),
            setter: accessor.setter(),
        }
    }

    /// A constant node: the getter always returns `value`, ignoring the
    /// document and context.
    pub fn lift(value: T) -> Self {
        let metadata = Metadata::Value(value.clone().into_value());
        Self::new(metadata, Arc::new(move |_, _| Some(value.clone())))
    }

    /// The metadata describing this node.
    #[must_use]
    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    /// Evaluates this node against a document.
    #[must_use]
    pub fn get(&self, target: &Value, ctx: &Context) -> Option<T> {
        (self.getter)(target, ctx)
    }

    /// Writes a value (or absence) through this node into the document.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::ReadOnly`] when the node carries no setter, and
    /// propagates any write error from the setter itself.
    pub fn set(&self, target: &mut Value, ctx: &Context, value: Option<T>) -> Result<(), PathError> {
        match &self.setter {
            Some(setter) => setter(target, ctx, value),
            None => Err(PathError::ReadOnly),
        }
    }

    /// Returns a node whose get/set calls are observed by `hook`.
    ///
    /// The decorator is composed here, once; combinators built from the
    /// returned node keep observing through it.
    #[must_use]
    pub fn with_interceptor(self, hook: Arc<dyn Interceptor>) -> Self {
        let getter = intercept_getter(self.metadata.clone(), hook.clone(), self.getter);
        let setter = self
            .setter
            .map(|setter| intercept_setter(self.metadata.clone(), hook, setter));
        Self {
            metadata: self.metadata,
            getter,
            setter,
        }
    }

    /// Tests whether this node evaluates to absence.
    #[must_use]
    pub fn is_null(&self) -> BooleanFunction {
        let metadata = Metadata::unary(self.metadata.clone(), Operator::IsNull);
        let left = self.clone();
        Function::new(
            metadata,
            Arc::new(move |target, ctx| Some(left.get(target, ctx).is_none())),
        )
    }

    /// Tests whether this node evaluates to a present value.
    #[must_use]
    pub fn is_not_null(&self) -> BooleanFunction {
        let metadata = Metadata::unary(self.metadata.clone(), Operator::IsNotNull);
        let left = self.clone();
        Function::new(
            metadata,
            Arc::new(move |target, ctx| Some(left.get(target, ctx).is_some())),
        )
    }

    /// Equality against a literal or another node.
    ///
    /// A null side yields `false` (the null-case default), never an error.
    pub fn eq(&self, value: impl Into<Operand<T>>) -> BooleanFunction {
        let operand = value.into();
        let metadata = Metadata::binary(self.metadata.clone(), Operator::Eq, operand.metadata());
        Function::new(metadata, condition(self, operand, |l, r| l == r, false))
    }

    /// Inequality against a literal or another node.
    ///
    /// A null side yields `false` (the null-case default), never an error.
    pub fn not_eq(&self, value: impl Into<Operand<T>>) -> BooleanFunction {
        let operand = value.into();
        let metadata = Metadata::binary(self.metadata.clone(), Operator::NotEq, operand.metadata());
        Function::new(metadata, condition(self, operand, |l, r| l != r, false))
    }

    /// True when this node equals every listed value; vacuously true on an
    /// empty list.
    pub fn match_all<I>(&self, values: I) -> BooleanFunction
    where
        I: IntoIterator,
        I::Item: Into<Operand<T>>,
    {
        let operands: Vec<Operand<T>> = values.into_iter().map(Into::into).collect();
        let metadata = self.iterable_metadata(Operator::MatchAll, &operands);
        let left = self.clone();
        Function::new(
            metadata,
            Arc::new(move |target, ctx| {
                Some(operands.iter().all(|op| equals(&left, op, target, ctx)))
            }),
        )
    }

    /// True when this node equals none of the listed values; vacuously true on
    /// an empty list.
    pub fn none_match<I>(&self, values: I) -> BooleanFunction
    where
        I: IntoIterator,
        I::Item: Into<Operand<T>>,
    {
        let operands: Vec<Operand<T>> = values.into_iter().map(Into::into).collect();
        let metadata = self.iterable_metadata(Operator::NoneMatch, &operands);
        let left = self.clone();
        Function::new(
            metadata,
            Arc::new(move |target, ctx| {
                Some(operands.iter().all(|op| !equals(&left, op, target, ctx)))
            }),
        )
    }

    /// True when this node equals at least one listed value; vacuously false
    /// on an empty list.
    pub fn match_any<I>(&self, values: I) -> BooleanFunction
    where
        I: IntoIterator,
        I::Item: Into<Operand<T>>,
    {
        let operands: Vec<Operand<T>> = values.into_iter().map(Into::into).collect();
        let metadata = self.iterable_metadata(Operator::MatchAny, &operands);
        let left = self.clone();
        Function::new(
            metadata,
            Arc::new(move |target, ctx| {
                Some(operands.iter().any(|op| equals(&left, op, target, ctx)))
            }),
        )
    }

    /// A node applying an arbitrary transform to this node's result.
    ///
    /// The transform runs even on absence, so it decides how to handle a
    /// `None` input itself. `ident` names the transform in the metadata, since
    /// a Rust closure carries no source text.
    pub fn map_to<U, F>(&self, ident: impl Into<String>, f: F) -> Function<U>
    where
        U: FieldType,
        F: Fn(Option<T>) -> Option<U> + Send + Sync + 'static,
    {
        let metadata = Metadata::binary(
            self.metadata.clone(),
            Operator::MapTo,
            Arc::new(Metadata::function_ref(ident)),
        );
        let left = self.clone();
        Function::new(metadata, Arc::new(move |target, ctx| f(left.get(target, ctx))))
    }

    fn iterable_metadata(&self, op: Operator, operands: &[Operand<T>]) -> Metadata {
        Metadata::binary(
            self.metadata.clone(),
            op,
            Arc::new(Metadata::iterable(
                operands.iter().map(Operand::metadata).collect(),
            )),
        )
    }
}

impl<T: FieldType> ContextAccessor<T> for Function<T> {
    fn metadata(&self) -> Arc<Metadata> {
        self.metadata.clone()
    }

    fn getter(&self) -> Getter<T> {
        self.getter.clone()
    }

    fn setter(&self) -> Option<Setter<T>> {
        self.setter.clone()
    }
}

/// The single chokepoint for null-propagating binary comparisons.
///
/// Evaluates the left node; on absence, returns `null_case` without touching
/// the right side. Otherwise evaluates the right side (when it is a node) and,
/// on absence there, returns `null_case` as well. Only when both sides are
/// present does the predicate run. Every default (non-short-circuit) binary
/// comparison in the algebra routes through here so null handling stays
/// consistent.
pub fn condition<T, V>(
    left: &Function<T>,
    right: Operand<T>,
    predicate: impl Fn(&T, &T) -> V + Send + Sync + 'static,
    null_case: V,
) -> Getter<V>
where
    T: FieldType,
    V: Clone + Send + Sync + 'static,
{
    let left = left.clone();
    match right {
        Operand::Value(rv) => Arc::new(move |target, ctx| match left.get(target, ctx) {
            Some(lv) => Some(predicate(&lv, &rv)),
            None => Some(null_case.clone()),
        }),
        Operand::Node(rn) => Arc::new(move |target, ctx| {
            let Some(lv) = left.get(target, ctx) else {
                return Some(null_case.clone());
            };
            match rn.get(target, ctx) {
                Some(rv) => Some(predicate(&lv, &rv)),
                None => Some(null_case.clone()),
            }
        }),
    }
}

/// One null-propagating equality comparison.
///
/// The left getter is re-invoked for every comparison on purpose: getters may
/// read mutable state, and callers must treat them as safe to invoke multiple
/// times with the same document and context.
fn equals<T: FieldType>(
    left: &Function<T>,
    operand: &Operand<T>,
    target: &Value,
    ctx: &Context,
) -> bool {
    let Some(lv) = left.get(target, ctx) else {
        return false;
    };
    match operand.resolve(target, ctx) {
        Some(rv) => lv == rv,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;

    fn doc(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_should_lift_constant_ignoring_document() {
        let node = Function::lift(42i64);
        let ctx = Context::new();
        assert_eq!(node.get(&Value::Null, &ctx), Some(42));
        assert_eq!(node.get(&doc(serde_json::json!({"a": 1})), &ctx), Some(42));
        assert_eq!(node.metadata().to_string(), "42");
    }

    #[test]
    fn test_should_compare_field_against_literal() {
        let age = field::<i64, _>(["age"]).unwrap();
        let is_thirty = age.eq(30);
        let ctx = Context::with_short_circuit(false);

        assert_eq!(is_thirty.get(&doc(serde_json::json!({"age": 30})), &ctx), Some(true));
        assert_eq!(is_thirty.get(&doc(serde_json::json!({"age": 31})), &ctx), Some(false));
        // Null-case default, not an error.
        assert_eq!(is_thirty.get(&doc(serde_json::json!({"age": null})), &ctx), Some(false));
        assert_eq!(is_thirty.get(&doc(serde_json::json!({})), &ctx), Some(false));
    }

    #[test]
    fn test_should_compare_two_nodes_against_same_document() {
        let a = field::<i64, _>(["a"]).unwrap();
        let b = field::<i64, _>(["b"]).unwrap();
        let same = a.eq(&b);
        let ctx = Context::new();

        assert_eq!(same.get(&doc(serde_json::json!({"a": 1, "b": 1})), &ctx), Some(true));
        assert_eq!(same.get(&doc(serde_json::json!({"a": 1, "b": 2})), &ctx), Some(false));
        // A null right side yields the default.
        assert_eq!(same.get(&doc(serde_json::json!({"a": 1})), &ctx), Some(false));
    }

    #[test]
    fn test_should_not_eq_with_null_default() {
        let name = field::<String, _>(["name"]).unwrap();
        let differs = name.not_eq("bob".to_owned());
        let ctx = Context::new();

        assert_eq!(differs.get(&doc(serde_json::json!({"name": "alice"})), &ctx), Some(true));
        assert_eq!(differs.get(&doc(serde_json::json!({"name": "bob"})), &ctx), Some(false));
        assert_eq!(differs.get(&doc(serde_json::json!({})), &ctx), Some(false));
    }

    #[test]
    fn test_should_test_nullness() {
        let name = field::<String, _>(["name"]).unwrap();
        let ctx = Context::new();
        assert_eq!(name.is_null().get(&doc(serde_json::json!({})), &ctx), Some(true));
        assert_eq!(
            name.is_not_null().get(&doc(serde_json::json!({"name": "x"})), &ctx),
            Some(true)
        );
    }

    #[test]
    fn test_should_treat_empty_multi_match_vacuously() {
        let color = field::<String, _>(["color"]).unwrap();
        let ctx = Context::new();
        let target = doc(serde_json::json!({"color": "red"}));
        let empty: Vec<String> = vec![];

        assert_eq!(color.match_all(empty.clone()).get(&target, &ctx), Some(true));
        assert_eq!(color.none_match(empty.clone()).get(&target, &ctx), Some(true));
        assert_eq!(color.match_any(empty).get(&target, &ctx), Some(false));
    }

    #[test]
    fn test_should_match_any_of_listed_values() {
        let color = field::<String, _>(["color"]).unwrap();
        let any = color.match_any(["red".to_owned(), "blue".to_owned()]);
        let ctx = Context::new();

        assert_eq!(any.get(&doc(serde_json::json!({"color": "blue"})), &ctx), Some(true));
        assert_eq!(any.get(&doc(serde_json::json!({"color": "green"})), &ctx), Some(false));
        assert_eq!(any.get(&doc(serde_json::json!({})), &ctx), Some(false));
    }

    #[test]
    fn test_should_none_match_with_null_left() {
        let color = field::<String, _>(["color"]).unwrap();
        let none = color.none_match(["red".to_owned()]);
        let ctx = Context::new();

        // Null never equals anything, so none-match holds.
        assert_eq!(none.get(&doc(serde_json::json!({})), &ctx), Some(true));
        assert_eq!(none.get(&doc(serde_json::json!({"color": "red"})), &ctx), Some(false));
    }

    #[test]
    fn test_should_match_all_against_node_and_literal() {
        let a = field::<i64, _>(["a"]).unwrap();
        let b = field::<i64, _>(["b"]).unwrap();
        let all = a.match_all([Operand::from(1i64), Operand::from(&b)]);
        let ctx = Context::new();

        assert_eq!(all.get(&doc(serde_json::json!({"a": 1, "b": 1})), &ctx), Some(true));
        assert_eq!(all.get(&doc(serde_json::json!({"a": 1, "b": 2})), &ctx), Some(false));
    }

    #[test]
    fn test_should_map_to_transform_including_absence() {
        let name = field::<String, _>(["name"]).unwrap();
        let length = name.map_to::<i64, _>("name_length", |v| {
            Some(v.map_or(0, |s| i64::try_from(s.len()).unwrap_or(i64::MAX)))
        });
        let ctx = Context::new();

        assert_eq!(length.get(&doc(serde_json::json!({"name": "alice"})), &ctx), Some(5));
        // The transform runs on absence too and chooses its own default.
        assert_eq!(length.get(&doc(serde_json::json!({})), &ctx), Some(0));
        assert_eq!(length.metadata().to_string(), "(name map to name_length)");
    }

    #[test]
    fn test_should_reject_set_on_combinator_node() {
        let age = field::<i64, _>(["age"]).unwrap();
        let derived = age.eq(30);
        let mut target = doc(serde_json::json!({}));
        let err = derived.set(&mut target, &Context::new(), Some(true)).unwrap_err();
        assert!(matches!(err, PathError::ReadOnly));
    }

    #[test]
    fn test_should_build_consumer_node() {
        let setter: Setter<i64> = {
            let path = crate::path::Path::new(["count"]).unwrap();
            Arc::new(move |target, _ctx, value| {
                path.write(target, value.map_or(Value::Null, FieldType::into_value))
            })
        };
        let sink = Function::consumer(Metadata::function_ref("count_sink"), setter);
        let ctx = Context::new();
        let mut target = doc(serde_json::json!({}));

        assert_eq!(sink.get(&target, &ctx), None);
        sink.set(&mut target, &ctx, Some(3)).unwrap();
        assert_eq!(target.as_map().unwrap().get("count"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_should_build_metadata_alongside_behavior() {
        let age = field::<i64, _>(["user", "age"]).unwrap();
        let expr = age.eq(30).and(field::<bool, _>(["active"]).unwrap().is_truthy());
        assert_eq!(
            expr.metadata().to_string(),
            "((user.age = 30) and active is truthy)"
        );
    }
}
