//! Composable typed accessors and predicate combinators over plain documents.
//!
//! Fieldstack builds expression trees in two parallel halves at once: an
//! executable getter/setter pair, and an immutable [`Metadata`] description of
//! the same shape for logging, serialization, or query translation. A caller
//! starts from a path-built [`Field`] (or a lifted literal), chains
//! combinators (`eq`, `match_any`, `and`, ...), and later evaluates the root
//! node repeatedly against concrete documents:
//!
//! ```
//! use fieldstack_core::{Context, Value, field};
//!
//! let adult = field::<i64, _>(["user", "age"])?
//!     .eq(30)
//!     .or(field::<bool, _>(["user", "admin"])?.is_truthy());
//!
//! let doc = Value::from(serde_json::json!({"user": {"age": 30}}));
//! assert_eq!(adult.get(&doc, &Context::new()), Some(true));
//! assert_eq!(adult.metadata().to_string(), "((user.age = 30) or user.admin is truthy)");
//! # Ok::<(), fieldstack_core::PathError>(())
//! ```
//!
//! Trees are persistent: no node is mutated after construction, and nodes may
//! be shared by multiple parent expressions. Evaluation is single-threaded and
//! synchronous per call, but an already-built tree may be evaluated from many
//! threads concurrently as long as user-supplied getters are side-effect-free.
//!
//! Absence is a value, never an error: missing path intermediates, wrong-shaped
//! data, and null operands all propagate as `None` or a combinator's
//! documented null-case default. The only synchronous errors are construction
//! misuse (empty path) and shape-mismatched writes ([`PathError`]).

pub mod accessor;
pub mod boolean;
pub mod context;
pub mod field;
pub mod function;
pub mod path;

pub use accessor::{ContextAccessor, Getter, Interceptor, Setter, TracingInterceptor};
pub use boolean::BooleanFunction;
pub use context::Context;
pub use field::{Field, field};
pub use fieldstack_model::{FieldType, Metadata, Operator, PathSegment, Value};
pub use function::{Function, Operand, condition};
pub use path::{Path, PathError};
