use serde::Deserialize;
use tracing_subscriber::{
    fmt::{self},
    prelude::*,
    EnvFilter,
};

/// Format for log output.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty-printed format.
    Pretty,
    /// JSON format for structured logging.
    Json,
    /// Minimal format with only essential information.
    #[default]
    Minimal,
}

/// Initializes the logging system.
///
/// `RUST_LOG` takes precedence; without it the crate logs at `info`. Logs go
/// to stderr so that `--json` output on stdout stays machine-readable.
pub fn init_logger(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let base = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Pretty => base
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_file(false)
                    .with_target(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init(),
        LogFormat::Json => base
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Minimal => base
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_level(true)
                    .with_target(false)
                    .compact(),
            )
            .init(),
    }
}
