//! Integration tests for the Fieldstack expression engine.
//!
//! These exercise the public API end-to-end: documents built from JSON,
//! predicate trees evaluated under both evaluation modes, writes through
//! fields, and metadata rendering.

use std::sync::Once;

use fieldstack_model::Value;

mod test_predicates;
mod test_writes;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .init();
    });
}

/// A sample customer document used across tests.
#[must_use]
pub fn sample_customer() -> Value {
    Value::from(serde_json::json!({
        "user": {
            "name": "alice",
            "age": 30,
            "admin": false,
            "address": { "city": "paris", "zip": 75001 },
            "tags": ["vip", "beta"],
        },
        "active": true,
    }))
}
