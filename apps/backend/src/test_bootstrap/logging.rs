use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing once for the unit-test binary. Output is captured
/// per test by the test harness.
pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("backend=debug,sqlx=warn")
            .with_test_writer()
            .try_init();
    });
}
