//! Toolchain configuration management
//!
//! This module turns a descriptor ([`Manifest`]) into a resolved, validated
//! [`ToolchainConfig`]. Resolution works like this:
//!
//! 1. Secrets come from a [`SecretProvider`] passed to [`ConfigLoader::new`]
//!    (normally the process environment layered over an untracked `.env`)
//! 2. The descriptor comes from `toolchain.toml`, or the shipped default
//! 3. URL templates are interpolated and every value is validated
//!
//! A secret that is not set does not fail the load. The affected endpoint is
//! kept unresolved and the error surfaces the first time it is used.
//!
//! # Examples
//!
//! ```rust,no_run
//! use linea_tools::config::ToolchainConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ToolchainConfig::load()?;
//! println!("solc {}", config.compiler_version());
//! let mainnet = config.network("linea_mainnet")?;
//! println!("RPC URL: {}", mainnet.rpc_url()?);
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use semver::Version;
use serde::{Serialize, Serializer};
use url::Url;

use crate::chains::canonical_chain_id;
use crate::error::{ConfigError, UsageError};
use crate::manifest::{
    ChainUrlsManifest, CustomChainManifest, EtherscanManifest, Manifest, NetworkManifest,
    SourcifyManifest, DEFAULT_DESCRIPTOR_PATH,
};
use crate::secrets::{self, Secret, SecretProvider, SecretRef};
use crate::template::{Rendered, Template};

/// Default secrets file, resolved against the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// RPC endpoint of a network, interpolated when every variable was available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Resolved { template: Template, url: Url },
    Unresolved { template: Template, missing: Vec<String> },
}

impl Endpoint {
    pub fn template(&self) -> &Template {
        match self {
            Endpoint::Resolved { template, .. } | Endpoint::Unresolved { template, .. } => {
                template
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Endpoint::Resolved { .. })
    }
}

/// A configured network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEndpoint {
    name: String,
    endpoint: Endpoint,
    accounts: Vec<SecretRef>,
    chain_id: Option<u64>,
}

impl NetworkEndpoint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn accounts(&self) -> &[SecretRef] {
        &self.accounts
    }

    /// The interpolated RPC URL.
    ///
    /// Fails with [`UsageError::MissingCredential`] naming the first unset
    /// variable when the template could not be interpolated.
    pub fn rpc_url(&self) -> Result<&Url, UsageError> {
        match &self.endpoint {
            Endpoint::Resolved { url, .. } => Ok(url),
            Endpoint::Unresolved { missing, .. } => Err(UsageError::MissingCredential {
                network: self.name.clone(),
                variable: missing.first().cloned().unwrap_or_default(),
            }),
        }
    }

    /// Signing key at `index` in `accounts`.
    pub fn signer(&self, index: usize) -> Result<(&str, &Secret), UsageError> {
        let account = self.accounts.get(index).ok_or_else(|| UsageError::NoSigner {
            network: self.name.clone(),
            index,
        })?;
        let secret = account.value().ok_or_else(|| UsageError::MissingCredential {
            network: self.name.clone(),
            variable: account.variable().to_string(),
        })?;
        Ok((account.variable(), secret))
    }

    /// Compare the configured chain id with the one an endpoint reports.
    ///
    /// Networks without a configured chain id accept any endpoint.
    pub fn check_chain_id(&self, reported: u64) -> Result<(), UsageError> {
        match self.chain_id {
            Some(expected) if expected != reported => Err(UsageError::ChainIdMismatch {
                network: self.name.clone(),
                expected,
                reported,
            }),
            _ => Ok(()),
        }
    }

    /// Whether every secret this network needs is available.
    pub fn is_ready(&self) -> bool {
        self.endpoint.is_resolved() && self.accounts.iter().all(SecretRef::is_present)
    }
}

/// A non-default verification endpoint set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomChain {
    pub network: String,
    pub chain_id: u64,
    pub api_url: Url,
    pub browser_url: Url,
}

/// Source verification settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    api_keys: BTreeMap<String, SecretRef>,
    custom_chains: Vec<CustomChain>,
}

impl Verification {
    pub fn api_keys(&self) -> &BTreeMap<String, SecretRef> {
        &self.api_keys
    }

    pub fn api_key(&self, network: &str) -> Option<&SecretRef> {
        self.api_keys.get(network)
    }

    pub fn custom_chains(&self) -> &[CustomChain] {
        &self.custom_chains
    }

    pub fn custom_chain(&self, network: &str) -> Option<&CustomChain> {
        self.custom_chains.iter().find(|c| c.network == network)
    }
}

/// Resolved toolchain configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    compiler_version: Version,
    networks: BTreeMap<String, NetworkEndpoint>,
    verification: Verification,
    sourcify_enabled: bool,
}

/// Options that change how strictly a descriptor is validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject verification entries that name an undeclared network.
    pub strict: bool,
}

/// Builds a [`ToolchainConfig`] from a descriptor and a secret provider.
#[derive(Debug, Clone)]
pub struct ConfigLoader<P> {
    secrets: P,
    options: LoadOptions,
}

impl<P: SecretProvider> ConfigLoader<P> {
    pub fn new(secrets: P) -> Self {
        Self {
            secrets,
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn load_path(&self, path: &Path) -> Result<ToolchainConfig, ConfigError> {
        tracing::debug!(path = %path.display(), "loading descriptor");
        self.load_manifest(&Manifest::from_path(path)?)
    }

    pub fn load_str(&self, content: &str) -> Result<ToolchainConfig, ConfigError> {
        self.load_manifest(&Manifest::from_toml_str(content)?)
    }

    pub fn load_shipped(&self) -> Result<ToolchainConfig, ConfigError> {
        self.load_manifest(&Manifest::shipped()?)
    }

    /// Interpolate and validate a parsed descriptor.
    pub fn load_manifest(&self, manifest: &Manifest) -> Result<ToolchainConfig, ConfigError> {
        let compiler_version = Version::parse(manifest.solidity.trim()).map_err(|source| {
            ConfigError::InvalidCompilerVersion {
                version: manifest.solidity.clone(),
                source,
            }
        })?;

        let mut networks = BTreeMap::new();
        for (name, network) in &manifest.networks {
            networks.insert(name.clone(), self.resolve_network(name, network)?);
        }

        let verification = self.resolve_verification(&manifest.etherscan)?;

        let config = ToolchainConfig {
            compiler_version,
            networks,
            verification,
            sourcify_enabled: manifest.sourcify.enabled,
        };
        config.validate_chain_ids()?;
        config.check_references(self.options.strict)?;

        tracing::info!(
            solc = %config.compiler_version,
            networks = config.networks.len(),
            custom_chains = config.verification.custom_chains.len(),
            sourcify = config.sourcify_enabled,
            "toolchain configuration loaded"
        );
        Ok(config)
    }

    fn resolve_network(
        &self,
        name: &str,
        network: &NetworkManifest,
    ) -> Result<NetworkEndpoint, ConfigError> {
        let field = format!("networks.{name}.url");
        let template = Template::parse(&network.url).map_err(|source| {
            ConfigError::InvalidTemplate {
                field: field.clone(),
                source,
            }
        })?;

        let endpoint = match template.render(&self.secrets) {
            Rendered::Complete(rendered) => {
                let url = parse_http_url(&rendered, &field)?;
                Endpoint::Resolved { template, url }
            }
            Rendered::Incomplete { missing } => {
                tracing::warn!(network = name, missing = ?missing, "RPC URL left unresolved");
                Endpoint::Unresolved { template, missing }
            }
        };

        if network.accounts.is_empty() {
            return Err(ConfigError::EmptyAccounts(name.to_string()));
        }
        let mut accounts = Vec::with_capacity(network.accounts.len());
        for (i, raw) in network.accounts.iter().enumerate() {
            let variable = SecretRef::parse(raw, &format!("networks.{name}.accounts[{i}]"))?;
            let account = SecretRef::resolve(variable, &self.secrets);
            if !account.is_present() {
                tracing::warn!(network = name, variable = account.variable(), "signing key not set");
            }
            accounts.push(account);
        }

        if let Some(configured) = network.chain_id {
            check_canonical(name, configured, &format!("networks.{name}.chainId"))?;
        }

        tracing::debug!(
            network = name,
            chain_id = ?network.chain_id,
            resolved = endpoint.is_resolved(),
            "network configured"
        );
        Ok(NetworkEndpoint {
            name: name.to_string(),
            endpoint,
            accounts,
            chain_id: network.chain_id,
        })
    }

    fn resolve_verification(
        &self,
        etherscan: &EtherscanManifest,
    ) -> Result<Verification, ConfigError> {
        let mut api_keys = BTreeMap::new();
        for (network, raw) in &etherscan.api_key {
            let variable = SecretRef::parse(raw, &format!("etherscan.apiKey.{network}"))?;
            let key = SecretRef::resolve(variable, &self.secrets);
            if !key.is_present() {
                tracing::warn!(network = %network, variable = key.variable(), "verification API key not set");
            }
            api_keys.insert(network.clone(), key);
        }

        let mut custom_chains: Vec<CustomChain> = Vec::with_capacity(etherscan.custom_chains.len());
        for (i, chain) in etherscan.custom_chains.iter().enumerate() {
            if custom_chains.iter().any(|c| c.network == chain.network) {
                return Err(ConfigError::DuplicateCustomChain(chain.network.clone()));
            }
            let prefix = format!("etherscan.customChains[{i}]");
            check_canonical(&chain.network, chain.chain_id, &format!("{prefix}.chainId"))?;
            custom_chains.push(CustomChain {
                network: chain.network.clone(),
                chain_id: chain.chain_id,
                api_url: parse_http_url(&chain.urls.api_url, &format!("{prefix}.urls.apiURL"))?,
                browser_url: parse_http_url(
                    &chain.urls.browser_url,
                    &format!("{prefix}.urls.browserURL"),
                )?,
            });
        }

        Ok(Verification {
            api_keys,
            custom_chains,
        })
    }
}

impl ToolchainConfig {
    /// Load from `toolchain.toml` in the working directory (or the shipped
    /// descriptor when absent), with secrets from the process environment
    /// layered over `.env`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None, Path::new(DEFAULT_ENV_FILE), LoadOptions::default())
    }

    /// Load with explicit descriptor and secrets-file locations.
    ///
    /// An explicit `descriptor` must exist. Without one, `toolchain.toml` in
    /// the working directory is used when present and the shipped descriptor
    /// otherwise. A missing secrets file is ignored.
    pub fn load_from(
        descriptor: Option<&Path>,
        env_file: &Path,
        options: LoadOptions,
    ) -> Result<Self, ConfigError> {
        let loader =
            ConfigLoader::new(secrets::environment_with_file(env_file)?).with_options(options);
        let default_path = Path::new(DEFAULT_DESCRIPTOR_PATH);
        match descriptor {
            Some(path) => loader.load_path(path),
            None if default_path.exists() => loader.load_path(default_path),
            None => {
                tracing::debug!(path = %default_path.display(), "descriptor not found, using shipped default");
                loader.load_shipped()
            }
        }
    }

    pub fn compiler_version(&self) -> &Version {
        &self.compiler_version
    }

    pub fn networks(&self) -> impl Iterator<Item = &NetworkEndpoint> {
        self.networks.values()
    }

    pub fn network(&self, name: &str) -> Result<&NetworkEndpoint, UsageError> {
        self.networks
            .get(name)
            .ok_or_else(|| UsageError::UnknownNetwork(name.to_string()))
    }

    pub fn verification(&self) -> &Verification {
        &self.verification
    }

    pub fn sourcify_enabled(&self) -> bool {
        self.sourcify_enabled
    }

    /// The plain descriptor form of this configuration.
    ///
    /// Resolved URLs are written out interpolated; secrets are written back
    /// as their `${VAR}` references. Loading the result with the same
    /// secrets yields the same URLs and chain ids.
    pub fn to_manifest(&self) -> Manifest {
        let networks = self
            .networks
            .iter()
            .map(|(name, network)| {
                let url = match &network.endpoint {
                    Endpoint::Resolved { url, .. } => url.to_string(),
                    Endpoint::Unresolved { template, .. } => template.to_string(),
                };
                let manifest = NetworkManifest {
                    url,
                    accounts: network.accounts.iter().map(SecretRef::reference).collect(),
                    chain_id: network.chain_id,
                };
                (name.clone(), manifest)
            })
            .collect();

        let etherscan = EtherscanManifest {
            api_key: self
                .verification
                .api_keys
                .iter()
                .map(|(network, key)| (network.clone(), key.reference()))
                .collect(),
            custom_chains: self
                .verification
                .custom_chains
                .iter()
                .map(|c| CustomChainManifest {
                    network: c.network.clone(),
                    chain_id: c.chain_id,
                    urls: ChainUrlsManifest {
                        api_url: c.api_url.to_string(),
                        browser_url: c.browser_url.to_string(),
                    },
                })
                .collect(),
        };

        Manifest {
            solidity: self.compiler_version.to_string(),
            networks,
            sourcify: SourcifyManifest {
                enabled: self.sourcify_enabled,
            },
            etherscan,
        }
    }

    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn validate_chain_ids(&self) -> Result<(), ConfigError> {
        let mut claimed: BTreeMap<u64, &str> = BTreeMap::new();
        for network in self.networks.values() {
            if let Some(id) = network.chain_id {
                if let Some(first) = claimed.insert(id, &network.name) {
                    return Err(ConfigError::DuplicateChainId {
                        section: "networks",
                        chain_id: id,
                        first: first.to_string(),
                        second: network.name.clone(),
                    });
                }
            }
        }

        let mut claimed: BTreeMap<u64, &str> = BTreeMap::new();
        for chain in &self.verification.custom_chains {
            if let Some(first) = claimed.insert(chain.chain_id, &chain.network) {
                return Err(ConfigError::DuplicateChainId {
                    section: "etherscan.customChains",
                    chain_id: chain.chain_id,
                    first: first.to_string(),
                    second: chain.network.clone(),
                });
            }
            let declared = self
                .networks
                .get(&chain.network)
                .and_then(NetworkEndpoint::chain_id);
            if let Some(network_chain_id) = declared {
                if network_chain_id != chain.chain_id {
                    return Err(ConfigError::ChainIdConflict {
                        network: chain.network.clone(),
                        network_chain_id,
                        custom_chain_id: chain.chain_id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Network names used by verification entries but not declared under `networks`.
    pub fn dangling_references(&self) -> Vec<(&'static str, &str)> {
        let mut seen = BTreeSet::new();
        let mut dangling = Vec::new();
        let referenced = self
            .verification
            .api_keys
            .keys()
            .map(|n| ("etherscan.apiKey", n.as_str()))
            .chain(
                self.verification
                    .custom_chains
                    .iter()
                    .map(|c| ("etherscan.customChains", c.network.as_str())),
            );
        for (section, network) in referenced {
            if !self.networks.contains_key(network) && seen.insert((section, network)) {
                dangling.push((section, network));
            }
        }
        dangling
    }

    fn check_references(&self, strict: bool) -> Result<(), ConfigError> {
        for (section, network) in self.dangling_references() {
            if strict {
                return Err(ConfigError::DanglingReference {
                    section,
                    network: network.to_string(),
                });
            }
            tracing::warn!(section, network, "verification entry names an undeclared network");
        }
        Ok(())
    }
}

/// Human-readable summary. URLs are shown as templates so API keys stay hidden.
impl fmt::Display for ToolchainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "╔════════════════════════════════════════════════════════════════╗")?;
        writeln!(f, "║         TOOLCHAIN CONFIGURATION RESOLVED                       ║")?;
        writeln!(f, "╚════════════════════════════════════════════════════════════════╝")?;
        writeln!(f, "  Compiler:            solc {}", self.compiler_version)?;

        for network in self.networks.values() {
            writeln!(f, "  Network:             {}", network.name)?;
            writeln!(f, "    RPC URL:           {}", network.endpoint.template())?;
            match network.chain_id {
                Some(id) => writeln!(f, "    Chain ID:          {id}")?,
                None => writeln!(f, "    Chain ID:          (not configured)")?,
            }
            let status = if network.is_ready() { "ready" } else { "missing credentials" };
            writeln!(f, "    Status:            {status}")?;
        }

        for (network, key) in &self.verification.api_keys {
            let state = if key.is_present() { "set" } else { "not set" };
            writeln!(
                f,
                "  Verification key:    {network} -> {} ({state})",
                key.reference()
            )?;
        }
        for chain in &self.verification.custom_chains {
            writeln!(
                f,
                "  Custom chain:        {} ({}) {}",
                chain.network, chain.chain_id, chain.api_url
            )?;
        }
        let sourcify = if self.sourcify_enabled { "ENABLED" } else { "disabled" };
        writeln!(f, "  Sourcify:            {sourcify}")?;
        write!(f, "╚════════════════════════════════════════════════════════════════╝")
    }
}

impl Serialize for ToolchainConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_manifest().serialize(serializer)
    }
}

fn parse_http_url(raw: &str, field: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        field: field.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "{field} must start with http:// or https://: {}",
            url.scheme()
        )));
    }
    Ok(url)
}

fn check_canonical(network: &str, configured: u64, field: &str) -> Result<(), ConfigError> {
    match canonical_chain_id(network) {
        Some(canonical) if canonical != configured => Err(ConfigError::CanonicalChainMismatch {
            field: field.to_string(),
            network: network.to_string(),
            configured,
            canonical,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MapSecrets;

    fn all_secrets() -> MapSecrets {
        MapSecrets::new()
            .with("PRIVATE_KEY", "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318")
            .with("INFURA_API_KEY", "ABC123")
            .with("LINEASCAN_API_KEY", "SCANKEY")
    }

    fn shipped(secrets: MapSecrets) -> ToolchainConfig {
        ConfigLoader::new(secrets).load_shipped().unwrap()
    }

    #[test]
    fn test_all_networks_resolve_with_secrets() {
        let config = shipped(all_secrets());
        assert_eq!(config.networks().count(), 2);
        for network in config.networks() {
            let url = network.rpc_url().unwrap();
            assert!(!url.as_str().is_empty());
            assert!(!url.as_str().contains("${"));
            assert!(!network.accounts().is_empty());
            assert!(network.is_ready());
        }
    }

    #[test]
    fn test_mainnet_url_interpolation() {
        let config = shipped(all_secrets());
        let mainnet = config.network("linea_mainnet").unwrap();
        assert_eq!(
            mainnet.rpc_url().unwrap().as_str(),
            "https://linea-mainnet.infura.io/v3/ABC123"
        );
        let testnet = config.network("linea_testnet").unwrap();
        assert_eq!(
            testnet.rpc_url().unwrap().as_str(),
            "https://linea-goerli.infura.io/v3/ABC123"
        );
    }

    #[test]
    fn test_chain_ids() {
        let config = shipped(all_secrets());
        assert_eq!(config.network("linea_mainnet").unwrap().chain_id(), Some(59144));
        assert_eq!(config.network("linea_testnet").unwrap().chain_id(), None);
        let goerli = config.verification().custom_chain("linea_goerli").unwrap();
        assert_eq!(goerli.chain_id, 59140);
        let mainnet = config.verification().custom_chain("linea_mainnet").unwrap();
        assert_eq!(mainnet.chain_id, 59144);
        assert_eq!(mainnet.browser_url.as_str(), "https://lineascan.build/");
    }

    #[test]
    fn test_defaults() {
        let config = shipped(all_secrets());
        assert!(config.sourcify_enabled());
        assert_eq!(config.compiler_version(), &Version::new(0, 8, 22));
    }

    #[test]
    fn test_api_keys_share_lineascan_key() {
        let config = shipped(all_secrets());
        let keys = config.verification().api_keys();
        let goerli = &keys["linea_goerli"];
        let mainnet = &keys["linea_mainnet"];
        assert_eq!(goerli.variable(), "LINEASCAN_API_KEY");
        assert_eq!(mainnet.variable(), "LINEASCAN_API_KEY");
        assert_eq!(goerli.value().unwrap().expose(), "SCANKEY");
        assert_eq!(goerli.value(), mainnet.value());
    }

    #[test]
    fn test_missing_private_key_loads() {
        let secrets = MapSecrets::new().with("INFURA_API_KEY", "ABC123");
        let config = shipped(secrets);
        let mainnet = config.network("linea_mainnet").unwrap();
        assert!(mainnet.rpc_url().is_ok());
        assert!(!mainnet.is_ready());
        let err = mainnet.signer(0).unwrap_err();
        assert_eq!(
            err,
            UsageError::MissingCredential {
                network: "linea_mainnet".to_string(),
                variable: "PRIVATE_KEY".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_infura_key_fails_on_use() {
        let config = shipped(MapSecrets::new());
        let mainnet = config.network("linea_mainnet").unwrap();
        assert!(!mainnet.endpoint().is_resolved());
        let err = mainnet.rpc_url().unwrap_err();
        assert!(err.is_missing_credential());
        assert!(err.to_string().contains("INFURA_API_KEY"), "{err}");
    }

    #[test]
    fn test_unknown_network() {
        let config = shipped(all_secrets());
        assert_eq!(
            config.network("linea_sepolia").unwrap_err(),
            UsageError::UnknownNetwork("linea_sepolia".to_string())
        );
    }

    #[test]
    fn test_round_trip_preserves_urls_and_chain_ids() {
        let loader = ConfigLoader::new(all_secrets());
        let first = loader.load_shipped().unwrap();
        let plain = first.to_manifest();
        let second = loader.load_manifest(&plain).unwrap();

        for network in first.networks() {
            let again = second.network(network.name()).unwrap();
            assert_eq!(network.rpc_url().unwrap(), again.rpc_url().unwrap());
            assert_eq!(network.chain_id(), again.chain_id());
        }
        assert_eq!(first.verification().custom_chains(), second.verification().custom_chains());
        assert_eq!(second.to_manifest(), plain);
    }

    #[test]
    fn test_plain_record_never_contains_private_key() {
        let config = shipped(all_secrets());
        let json = config.to_json().unwrap();
        assert!(!json.contains("4c0883a69102937d"));
        assert!(!json.contains("SCANKEY"));
        assert!(json.contains("${PRIVATE_KEY}"));
        assert!(json.contains("\"chainId\": 59144"));
    }

    #[test]
    fn test_summary_hides_api_key() {
        let config = shipped(all_secrets());
        let summary = config.to_string();
        assert!(!summary.contains("ABC123"));
        assert!(summary.contains("${INFURA_API_KEY}"));
        assert!(summary.contains("solc 0.8.22"));
    }

    #[test]
    fn test_check_chain_id() {
        let config = shipped(all_secrets());
        let mainnet = config.network("linea_mainnet").unwrap();
        assert!(mainnet.check_chain_id(59144).is_ok());
        assert!(matches!(
            mainnet.check_chain_id(59140),
            Err(UsageError::ChainIdMismatch { expected: 59144, reported: 59140, .. })
        ));
        let testnet = config.network("linea_testnet").unwrap();
        assert!(testnet.check_chain_id(12345).is_ok());
    }

    #[test]
    fn test_rejects_invalid_compiler_version() {
        let err = ConfigLoader::new(MapSecrets::new())
            .load_str("solidity = \"0.8\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCompilerVersion { .. }));
    }

    #[test]
    fn test_rejects_literal_private_key() {
        let content = r#"
solidity = "0.8.22"
[networks.linea_mainnet]
url = "https://linea-mainnet.infura.io/v3/${INFURA_API_KEY}"
accounts = ["0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"]
"#;
        let err = ConfigLoader::new(all_secrets()).load_str(content).unwrap_err();
        assert!(
            matches!(err, ConfigError::SecretLiteral { ref field } if field == "networks.linea_mainnet.accounts[0]")
        );
    }

    #[test]
    fn test_rejects_literal_api_key() {
        let content = r#"
solidity = "0.8.22"
[etherscan.apiKey]
linea_mainnet = "ABCDEF"
"#;
        let err = ConfigLoader::new(all_secrets()).load_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::SecretLiteral { .. }));
    }

    #[test]
    fn test_rejects_empty_accounts() {
        let content = r#"
solidity = "0.8.22"
[networks.local]
url = "http://localhost:8545"
accounts = []
"#;
        let err = ConfigLoader::new(all_secrets()).load_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyAccounts(ref n) if n == "local"));
    }

    #[test]
    fn test_rejects_malformed_template() {
        let content = r#"
solidity = "0.8.22"
[networks.local]
url = "http://localhost:8545/${KEY"
accounts = ["${PRIVATE_KEY}"]
"#;
        let err = ConfigLoader::new(all_secrets()).load_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let content = r#"
solidity = "0.8.22"
[networks.local]
url = "ws://localhost:8546"
accounts = ["${PRIVATE_KEY}"]
"#;
        let err = ConfigLoader::new(all_secrets()).load_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_unparseable_resolved_url() {
        let content = r#"
solidity = "0.8.22"
[networks.local]
url = "${RPC_HOST}:8545"
accounts = ["${PRIVATE_KEY}"]
"#;
        let secrets = all_secrets().with("RPC_HOST", "not a url");
        let err = ConfigLoader::new(secrets).load_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_rejects_canonical_mismatch() {
        let content = r#"
solidity = "0.8.22"
[networks.linea_mainnet]
url = "https://rpc.linea.build"
accounts = ["${PRIVATE_KEY}"]
chainId = 59140
"#;
        let err = ConfigLoader::new(all_secrets()).load_str(content).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CanonicalChainMismatch { configured: 59140, canonical: 59144, .. }
        ));
    }

    #[test]
    fn test_rejects_duplicate_chain_id() {
        let content = r#"
solidity = "0.8.22"
[networks.devnet_a]
url = "http://localhost:8545"
accounts = ["${PRIVATE_KEY}"]
chainId = 31337
[networks.devnet_b]
url = "http://localhost:8546"
accounts = ["${PRIVATE_KEY}"]
chainId = 31337
"#;
        let err = ConfigLoader::new(all_secrets()).load_str(content).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateChainId { chain_id: 31337, section: "networks", .. }
        ));
    }

    #[test]
    fn test_rejects_conflicting_custom_chain() {
        let content = r#"
solidity = "0.8.22"
[networks.devnet]
url = "http://localhost:8545"
accounts = ["${PRIVATE_KEY}"]
chainId = 31337
[[etherscan.customChains]]
network = "devnet"
chainId = 31338
[etherscan.customChains.urls]
apiURL = "http://localhost:4000/api"
browserURL = "http://localhost:4000/"
"#;
        let err = ConfigLoader::new(all_secrets()).load_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::ChainIdConflict { .. }));
    }

    #[test]
    fn test_rejects_duplicate_custom_chain() {
        let chain = r#"
[[etherscan.customChains]]
network = "devnet"
chainId = 31337
[etherscan.customChains.urls]
apiURL = "http://localhost:4000/api"
browserURL = "http://localhost:4000/"
"#;
        let content = format!("solidity = \"0.8.22\"\n{chain}{chain}");
        let err = ConfigLoader::new(all_secrets()).load_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCustomChain(ref n) if n == "devnet"));
    }

    #[test]
    fn test_shipped_dangling_references_are_lenient() {
        let config = shipped(all_secrets());
        let dangling = config.dangling_references();
        assert_eq!(
            dangling,
            vec![
                ("etherscan.apiKey", "linea_goerli"),
                ("etherscan.customChains", "linea_goerli"),
            ]
        );
    }

    #[test]
    fn test_strict_rejects_dangling_references() {
        let err = ConfigLoader::new(all_secrets())
            .with_options(LoadOptions { strict: true })
            .load_shipped()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DanglingReference { section: "etherscan.apiKey", ref network } if network == "linea_goerli"
        ));
    }
}
