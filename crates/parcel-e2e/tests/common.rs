// Shared test utilities
//
// Note: Functions appear "unused" because each test binary compiles
// separately, but they ARE used across multiple test files.
#![allow(dead_code)]

use std::sync::Once;

static TRACING: Once = Once::new();

/// Initializes tracing once per test binary. Honors RUST_LOG.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
