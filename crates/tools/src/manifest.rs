//! On-disk descriptor schema (`toolchain.toml`)
//!
//! Key names follow the shape the external build tool expects (`chainId`,
//! `apiKey`, `customChains`, `apiURL`, ...). Unknown keys are rejected at
//! parse time. Values here are raw: templates are not yet interpolated and
//! secret references are not yet resolved; see [`crate::config`] for that.
//!
//! ```toml
//! solidity = "0.8.22"
//!
//! [networks.linea_mainnet]
//! url = "https://linea-mainnet.infura.io/v3/${INFURA_API_KEY}"
//! accounts = ["${PRIVATE_KEY}"]
//! chainId = 59144
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Descriptor shipped with the crate.
pub const SHIPPED_DESCRIPTOR: &str = include_str!("../toolchain.toml");

/// Default descriptor file name, resolved against the working directory.
pub const DEFAULT_DESCRIPTOR_PATH: &str = "toolchain.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Compiler release
    pub solidity: String,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkManifest>,
    #[serde(default)]
    pub sourcify: SourcifyManifest,
    #[serde(default)]
    pub etherscan: EtherscanManifest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkManifest {
    /// RPC URL template
    pub url: String,
    /// `${VAR}` references to signing keys
    pub accounts: Vec<String>,
    #[serde(rename = "chainId", default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcifyManifest {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SourcifyManifest {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EtherscanManifest {
    /// Network name to `${VAR}` reference
    #[serde(rename = "apiKey", default)]
    pub api_key: BTreeMap<String, String>,
    #[serde(rename = "customChains", default)]
    pub custom_chains: Vec<CustomChainManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomChainManifest {
    pub network: String,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    pub urls: ChainUrlsManifest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainUrlsManifest {
    #[serde(rename = "apiURL")]
    pub api_url: String,
    #[serde(rename = "browserURL")]
    pub browser_url: String,
}

fn default_true() -> bool {
    true
}

impl Manifest {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::TomlError)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// The descriptor shipped with the crate.
    pub fn shipped() -> Result<Self, ConfigError> {
        Self::from_toml_str(SHIPPED_DESCRIPTOR)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
