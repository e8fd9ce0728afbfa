// ABOUTME: Test support utilities.
// ABOUTME: Scripted doubles for the transport, protocol, and reliable-API seams.

use std::sync::Once;

#[allow(dead_code)]
pub mod scripted_ops;
#[allow(dead_code)]
pub mod scripted_transport;
#[allow(dead_code)]
pub mod simulated_api;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("gantry=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}
