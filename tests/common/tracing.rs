use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber once (used by tests that run with `RUST_LOG`).
///
/// Without `RUST_LOG` only warnings are shown, so failed loads stay visible
/// while the search-path trace from the loader stays quiet. Output goes through
/// the test writer so it is captured per test.
pub fn init_tracing_from_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_test_writer();
        let _ = subscriber.try_init();
    });
}

