//! Linea Tools Library
//!
//! Typed configuration for the contract toolchain: target networks, signing
//! keys and API keys sourced from the environment, compiler selection, and
//! source-verification endpoints.

pub mod chains;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod secrets;
pub mod session;
pub mod settings;
pub mod template;

pub use crate::config::{ConfigLoader, LoadOptions, NetworkEndpoint, ToolchainConfig};
pub use crate::error::{ConfigError, UsageError};
pub use crate::manifest::Manifest;
pub use crate::secrets::{EnvSecrets, Layered, MapSecrets, SecretProvider};
pub use crate::session::{Session, Submission, VerificationTarget};
