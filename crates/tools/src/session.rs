//! First-use operations over a loaded configuration.
//!
//! Nothing here talks to a node or an explorer. The operations resolve and
//! check everything a deploy or verify step needs, so a missing credential
//! fails here with a clear error instead of reaching a network call.

use std::str::FromStr;

use alloy_primitives::{keccak256, Address, Signature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use serde::Serialize;
use url::Url;

use crate::config::ToolchainConfig;
use crate::error::UsageError;
use crate::secrets::Secret;

/// Public Sourcify server.
pub const SOURCIFY_SERVER_URL: &str = "https://sourcify.dev/server";

/// A signed submission that was never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub network: String,
    /// Host of the RPC endpoint. The full URL carries the API key and is not recorded.
    pub rpc_host: String,
    pub chain_id: Option<u64>,
    /// Environment variable holding the signing key
    pub signer: String,
    /// Address derived from the signing key
    pub signer_address: Address,
    pub payload_len: usize,
    /// Keccak-256 of the payload
    pub payload_digest: B256,
    /// Signature over `payload_digest`
    pub signature: Signature,
}

/// Where and how to verify contract sources for a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationTarget {
    Etherscan {
        network: String,
        chain_id: u64,
        api_url: Url,
        browser_url: Url,
        api_key: Secret,
    },
    Sourcify {
        network: String,
        chain_id: u64,
        server_url: Url,
    },
}

impl VerificationTarget {
    pub fn chain_id(&self) -> u64 {
        match self {
            VerificationTarget::Etherscan { chain_id, .. }
            | VerificationTarget::Sourcify { chain_id, .. } => *chain_id,
        }
    }

    pub fn api_url(&self) -> &Url {
        match self {
            VerificationTarget::Etherscan { api_url, .. } => api_url,
            VerificationTarget::Sourcify { server_url, .. } => server_url,
        }
    }
}

pub struct Session<'a> {
    config: &'a ToolchainConfig,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a ToolchainConfig) -> Self {
        Self { config }
    }

    /// Sign `payload` for `network` with the first configured account, without sending it.
    ///
    /// Fails when the RPC URL or the key is unset, or when the key is not a
    /// valid secp256k1 private key.
    pub fn sign_and_submit(&self, network: &str, payload: &[u8]) -> Result<Submission, UsageError> {
        let endpoint = self.config.network(network)?;
        let url = endpoint.rpc_url()?;
        let (variable, key) = endpoint.signer(0)?;
        let signer = parse_signer(network, variable, key)?;

        let payload_digest = keccak256(payload);
        let signature = signer
            .sign_hash_sync(&payload_digest)
            .map_err(|e| UsageError::InvalidCredential {
                network: network.to_string(),
                variable: variable.to_string(),
                reason: e.to_string(),
            })?;

        let submission = Submission {
            network: network.to_string(),
            rpc_host: url.host_str().unwrap_or_default().to_string(),
            chain_id: endpoint.chain_id(),
            signer: variable.to_string(),
            signer_address: signer.address(),
            payload_len: payload.len(),
            payload_digest,
            signature,
        };
        tracing::info!(
            network,
            host = %submission.rpc_host,
            chain_id = ?submission.chain_id,
            signer = %submission.signer_address,
            bytes = submission.payload_len,
            digest = %submission.payload_digest,
            "signed submission (dry run)"
        );
        Ok(submission)
    }

    /// Check the chain id an endpoint reported against the configuration.
    pub fn confirm_chain(&self, network: &str, reported: u64) -> Result<(), UsageError> {
        self.config.network(network)?.check_chain_id(reported)
    }

    /// Etherscan-compatible target from `etherscan.customChains` and `etherscan.apiKey`.
    pub fn etherscan_target(&self, network: &str) -> Result<VerificationTarget, UsageError> {
        let verification = self.config.verification();
        let chain = verification
            .custom_chain(network)
            .ok_or_else(|| UsageError::UnknownVerificationNetwork(network.to_string()))?;
        let key = verification
            .api_key(network)
            .ok_or_else(|| UsageError::NoApiKey(network.to_string()))?;
        let api_key = key.value().cloned().ok_or_else(|| UsageError::MissingCredential {
            network: network.to_string(),
            variable: key.variable().to_string(),
        })?;

        Ok(VerificationTarget::Etherscan {
            network: network.to_string(),
            chain_id: chain.chain_id,
            api_url: chain.api_url.clone(),
            browser_url: chain.browser_url.clone(),
            api_key,
        })
    }

    /// Keyless Sourcify target.
    ///
    /// The chain id comes from the network entry, then the custom chain, then
    /// the canonical registry.
    pub fn sourcify_target(&self, network: &str) -> Result<VerificationTarget, UsageError> {
        if !self.config.sourcify_enabled() {
            return Err(UsageError::SourcifyDisabled);
        }
        let chain_id = self
            .config
            .network(network)
            .ok()
            .and_then(|n| n.chain_id())
            .or_else(|| {
                self.config
                    .verification()
                    .custom_chain(network)
                    .map(|c| c.chain_id)
            })
            .or_else(|| crate::chains::canonical_chain_id(network))
            .ok_or_else(|| UsageError::UnknownVerificationNetwork(network.to_string()))?;
        let server_url = Url::parse(SOURCIFY_SERVER_URL)
            .map_err(|e| UsageError::UnknownVerificationNetwork(format!("{network}: {e}")))?;

        Ok(VerificationTarget::Sourcify {
            network: network.to_string(),
            chain_id,
            server_url,
        })
    }

    /// Etherscan when its key is available, otherwise Sourcify when enabled.
    pub fn verification_target(&self, network: &str) -> Result<VerificationTarget, UsageError> {
        match self.etherscan_target(network) {
            Ok(target) => Ok(target),
            Err(err) if self.config.sourcify_enabled() => {
                tracing::debug!(network, error = %err, "falling back to sourcify");
                self.sourcify_target(network).map_err(|_| err)
            }
            Err(err) => Err(err),
        }
    }
}

fn parse_signer(network: &str, variable: &str, key: &Secret) -> Result<PrivateKeySigner, UsageError> {
    let raw = key.expose().trim();
    let raw = raw.strip_prefix("0X").unwrap_or(raw);
    PrivateKeySigner::from_str(raw).map_err(|e| UsageError::InvalidCredential {
        network: network.to_string(),
        variable: variable.to_string(),
        reason: e.to_string(),
    })
}
