//! Per-evaluation context.

/// State threaded through every getter and setter call.
///
/// A context is constructed fresh per evaluation (or per evaluation session)
/// and never persisted. The default context selects eager evaluation; setting
/// [`short_circuit`](Self::short_circuit) switches the boolean combinators to
/// their short-circuit strategy, which skips evaluating an operand once the
/// result is already determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    /// When `true`, boolean combinators stop evaluating as soon as the left
    /// operand determines the result.
    pub short_circuit: bool,
}

impl Context {
    /// An eager-evaluation context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with the given short-circuit setting.
    #[must_use]
    pub fn with_short_circuit(short_circuit: bool) -> Self {
        Self { short_circuit }
    }
}
