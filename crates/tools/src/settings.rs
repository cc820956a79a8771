use std::path::PathBuf;

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::config::DEFAULT_ENV_FILE;
use crate::logging::LogFormat;

/// Environment prefix for process settings, e.g. `LINEA_TOOLS_LOG_FORMAT`.
pub const ENV_PREFIX: &str = "LINEA_TOOLS";

/// Settings for the CLI process.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// The format for logging.
    pub log_format: LogFormat,
    /// Path of the toolchain descriptor. When unset, `toolchain.toml` is used
    /// if present, else the shipped descriptor.
    pub config_path: Option<PathBuf>,
    /// Path of the untracked secrets file.
    pub env_file: PathBuf,
    /// Reject verification entries naming undeclared networks.
    pub strict: bool,
}

impl Settings {
    /// Create a new Settings instance from environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("log_format", "Minimal")?
            .set_default("env_file", DEFAULT_ENV_FILE)?
            .set_default("strict", false)?
            .add_source(environment.try_parsing(true))
            .build()?;

        config.try_deserialize()
    }
}
