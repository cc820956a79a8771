//! Canonical chain ids for network names the toolchain recognizes.

use std::fmt;

/// Chains with a well-known chain id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownChain {
    /// Ethereum mainnet
    Ethereum,
    /// Ethereum Sepolia testnet
    Sepolia,
    /// Linea mainnet
    LineaMainnet,
    /// Linea Goerli testnet (retired, still used by older deployments)
    LineaGoerli,
    /// Linea Sepolia testnet
    LineaSepolia,
}

impl KnownChain {
    pub const ALL: [KnownChain; 5] = [
        KnownChain::Ethereum,
        KnownChain::Sepolia,
        KnownChain::LineaMainnet,
        KnownChain::LineaGoerli,
        KnownChain::LineaSepolia,
    ];

    /// Canonical network name
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownChain::Ethereum => "mainnet",
            KnownChain::Sepolia => "sepolia",
            KnownChain::LineaMainnet => "linea_mainnet",
            KnownChain::LineaGoerli => "linea_goerli",
            KnownChain::LineaSepolia => "linea_sepolia",
        }
    }

    /// Look up a network name. `linea_testnet` is the Goerli-era testnet.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        let canonical = match name.as_str() {
            "ethereum" => "mainnet",
            "linea" => "linea_mainnet",
            "linea_testnet" => "linea_goerli",
            other => other,
        };
        Self::ALL.into_iter().find(|c| c.as_str() == canonical)
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            KnownChain::Ethereum => 1,
            KnownChain::Sepolia => 11_155_111,
            KnownChain::LineaMainnet => 59_144,
            KnownChain::LineaGoerli => 59_140,
            KnownChain::LineaSepolia => 59_141,
        }
    }
}

impl fmt::Display for KnownChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical chain id for a network name, if the name is recognized.
pub fn canonical_chain_id(network: &str) -> Option<u64> {
    KnownChain::from_name(network).map(|c| c.chain_id())
}
