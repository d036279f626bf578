//! Tracing subscriber setup
//!
//! Shared by the checker binary and its tests.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Logs go to `log_file_path` when given, stderr otherwise. `RUST_LOG`
/// directives are honoured on top of an INFO default.
pub fn init_global(log_file_path: Option<&Path>) -> anyhow::Result<()> {
    match log_file_path {
        Some(path) => {
            let log_file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            build_subscriber(Arc::new(log_file), tracing::Level::INFO).try_init()?;
        }
        None => build_subscriber(std::io::stderr, tracing::Level::INFO).try_init()?,
    }
    Ok(())
}

/// Build a subscriber writing formatted events to `writer`.
pub fn build_subscriber<W>(
    writer: W,
    default_level: tracing::Level,
) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
