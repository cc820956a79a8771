//! Error types for loading and using the toolchain configuration.
//!
//! Loading and use fail at different times. [`ConfigError`] is raised while the
//! descriptor is read and validated. [`UsageError`] is raised the first time a
//! network or verification entry is actually used, which is where an unset
//! secret surfaces.

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Secrets file error: {0}")]
    SecretsFile(#[from] dotenvy::Error),

    #[error("Invalid compiler version {version:?}: {source}")]
    InvalidCompilerVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("Invalid template in {field}: {source}")]
    InvalidTemplate {
        field: String,
        #[source]
        source: TemplateError,
    },

    #[error("Invalid URL in {field}: {source}")]
    InvalidUrl {
        field: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Secret literal in {field}; write it as a ${{VAR}} reference")]
    SecretLiteral { field: String },

    #[error("Network {0} has no accounts configured")]
    EmptyAccounts(String),

    #[error("Chain id {chain_id} is claimed by both {first} and {second} in {section}")]
    DuplicateChainId {
        section: &'static str,
        chain_id: u64,
        first: String,
        second: String,
    },

    #[error("Custom chain for {0} is registered more than once")]
    DuplicateCustomChain(String),

    #[error("Network {network} declares chainId {network_chain_id} but its custom chain declares {custom_chain_id}")]
    ChainIdConflict {
        network: String,
        network_chain_id: u64,
        custom_chain_id: u64,
    },

    #[error("{field} is {configured} but {network} is chain {canonical}")]
    CanonicalChainMismatch {
        field: String,
        network: String,
        configured: u64,
        canonical: u64,
    },

    #[error("{section} references network {network} which is not declared under networks")]
    DanglingReference {
        section: &'static str,
        network: String,
    },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Errors raised when a configured network or verification entry is used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing credential: {variable} is not set (required by {network})")]
    MissingCredential { network: String, variable: String },

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("no verification endpoint registered for {0}")]
    UnknownVerificationNetwork(String),

    #[error("no verification API key configured for {0}")]
    NoApiKey(String),

    #[error("network {network} has no signer at index {index}")]
    NoSigner { network: String, index: usize },

    #[error("invalid credential {variable} for {network}: {reason}")]
    InvalidCredential {
        network: String,
        variable: String,
        reason: String,
    },

    #[error("chain id mismatch on {network}: configured {expected}, endpoint reports {reported}")]
    ChainIdMismatch {
        network: String,
        expected: u64,
        reported: u64,
    },

    #[error("sourcify verification is disabled")]
    SourcifyDisabled,
}

impl UsageError {
    /// Whether the error stems from a secret that was never provided.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, UsageError::MissingCredential { .. } | UsageError::NoApiKey(_))
    }
}
