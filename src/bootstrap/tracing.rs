//! Tracing configuration for Devora
//!
//! Installs the global `tracing-subscriber` registry:
//!
//! - an env-filter, overridable with `RUST_LOG`
//! - a stderr layer, so command output on stdout stays machine readable
//! - a non-blocking file layer under `<data dir>/logs/devora.log`
//!
//! When the log directory cannot be created the file layer is skipped and
//! only stderr is used.

use std::{fs, io, path::Path, sync::OnceLock};

use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::{DefaultFields, Format, Full};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, registry};

use dv_infra::fs::logs_dir;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "devora.log";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives, used when `RUST_LOG` is unset.
///
/// The domain crates log per-range fetches at debug; keep them at info in
/// release builds.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("dv_app={level}"),
        format!("dv_infra={level}"),
        "dv_core=info".to_string(),
    ]
}

/// Initialize the tracing subscriber.
///
/// Call once from `main`, after the config is loaded (the log directory lives
/// under the configured data dir) and before any use case runs.
///
/// ## Errors
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(data_dir: &Path) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let stderr_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = match build_file_writer(data_dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
    };

    let stderr_layer = fmt_layer(stderr_writer, cfg!(not(test)));
    let file_layer = file_writer.map(|writer| fmt_layer(writer, false));

    let subscriber = registry().with(env_filter).with(stderr_layer);
    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

/// "2026-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
fn fmt_layer<S, W>(
    writer: W,
    ansi: bool,
) -> fmt::Layer<S, DefaultFields, Format<Full, ChronoUtc>, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .with_timer(ChronoUtc::new(TIME_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer)
}

fn build_file_writer(data_dir: &Path) -> anyhow::Result<NonBlocking> {
    let dir = logs_dir(data_dir);
    fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_directives_follow_build_profile() {
        let dev = build_filter_directives(true);
        assert!(dev.contains(&"debug".to_string()));
        assert!(dev.contains(&"dv_app=debug".to_string()));
        assert!(dev.contains(&"dv_core=info".to_string()));

        let prod = build_filter_directives(false);
        assert!(prod.contains(&"info".to_string()));
        assert!(prod.contains(&"dv_infra=info".to_string()));
    }
}
