//! Boolean specialization: logical combinators with three-valued-aware,
//! short-circuit-capable evaluation.
//!
//! Evaluation of `and`/`or` is a two-state decision driven by the context:
//!
//! - **Eager** (`short_circuit` false, the default): both sides evaluate
//!   through the null-propagating [`condition`] helper; any null operand
//!   forces the null-case default `false`.
//! - **Short-circuit** (`short_circuit` true): the left operand evaluates
//!   first; when it already determines the result, the right getter is never
//!   invoked. Null is treated as absent/falsy, not as "unknown".
//!
//! The divergence between the two modes, including the asymmetric null
//! handling (e.g. `or` with a true left ignores a null right in short-circuit
//! mode but yields `false` eagerly), is a deliberate contract: short-circuit
//! mode exists to skip expensive or side-effecting right-hand getters, which
//! changes whether those side effects occur at all.

use std::sync::Arc;

use fieldstack_model::{Metadata, Operator};

use crate::function::{Function, Operand, condition};

/// An expression node restricted to boolean values.
pub type BooleanFunction = Function<bool>;

impl Function<bool> {
    /// Logical conjunction with a literal or another boolean node.
    ///
    /// Short-circuit mode: a null or false left yields `false` without
    /// invoking the right side; a true left yields the right side with null
    /// coerced to `false`.
    pub fn and(&self, right: impl Into<Operand<bool>>) -> BooleanFunction {
        let operand = right.into();
        let metadata = Metadata::binary(
            self.metadata().clone(),
            Operator::And,
            operand.metadata(),
        );
        let left = self.clone();
        let eager = condition(self, operand.clone(), |l, r| *l && *r, false);
        Function::new(
            metadata,
            Arc::new(move |target, ctx| {
                if ctx.short_circuit {
                    match left.get(target, ctx) {
                        Some(true) => Some(operand.resolve(target, ctx).unwrap_or(false)),
                        Some(false) | None => Some(false),
                    }
                } else {
                    eager(target, ctx)
                }
            }),
        )
    }

    /// Logical disjunction with a literal or another boolean node.
    ///
    /// Short-circuit mode: a null left yields `false`; a true left yields
    /// `true` without invoking the right side; a false left yields the right
    /// side with null coerced to `false`.
    pub fn or(&self, right: impl Into<Operand<bool>>) -> BooleanFunction {
        let operand = right.into();
        let metadata = Metadata::binary(
            self.metadata().clone(),
            Operator::Or,
            operand.metadata(),
        );
        let left = self.clone();
        let eager = condition(self, operand.clone(), |l, r| *l || *r, false);
        Function::new(
            metadata,
            Arc::new(move |target, ctx| {
                if ctx.short_circuit {
                    match left.get(target, ctx) {
                        Some(true) => Some(true),
                        Some(false) => Some(operand.resolve(target, ctx).unwrap_or(false)),
                        None => Some(false),
                    }
                } else {
                    eager(target, ctx)
                }
            }),
        )
    }

    /// Logical negation; a null input yields `false`, not a toggled null.
    #[must_use]
    pub fn not(&self) -> BooleanFunction {
        let metadata = Metadata::unary(self.metadata().clone(), Operator::Not);
        let left = self.clone();
        Function::new(
            metadata,
            Arc::new(move |target, ctx| Some(left.get(target, ctx).is_some_and(|b| !b))),
        )
    }

    /// True only when the node evaluates to `true`; null is never truthy.
    #[must_use]
    pub fn is_truthy(&self) -> BooleanFunction {
        let metadata = Metadata::unary(self.metadata().clone(), Operator::IsTruthy);
        let left = self.clone();
        Function::new(
            metadata,
            Arc::new(move |target, ctx| Some(left.get(target, ctx) == Some(true))),
        )
    }

    /// True when the node evaluates to `false` or to absence.
    #[must_use]
    pub fn is_falsy(&self) -> BooleanFunction {
        let metadata = Metadata::unary(self.metadata().clone(), Operator::IsFalsy);
        let left = self.clone();
        Function::new(
            metadata,
            Arc::new(move |target, ctx| Some(left.get(target, ctx).is_none_or(|b| !b))),
        )
    }
}
