//! Tracing setup: compact console output plus a daily rolling log file
//!
//! Reward updates are emitted under the `emobuddy::training` target, so the
//! file log doubles as the training log.

use crate::errors::{AgentError, Result};
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log file prefix; the appender adds the date suffix
pub const LOG_FILE_PREFIX: &str = "emobuddy.log";

/// Console level used when the user has not asked for verbose output
pub const QUIET_CONSOLE_LEVEL: &str = "warn";

/// Map `-v` repetitions onto a console level
pub fn console_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => QUIET_CONSOLE_LEVEL,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `RUST_LOG` wins over the configured level
fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the whole process; dropping it stops
/// the background file writer.
pub fn init(log_dir: &Path, file_level: &str, console_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(build_env_filter(console_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(build_env_filter(file_level)),
        )
        .try_init()
        .map_err(|e| AgentError::Generic(format!("Failed to install logger: {}", e)))?;

    info!(log_dir = %log_dir.display(), level = file_level, "logging initialised");
    Ok(guard)
}
