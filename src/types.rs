// src/types.rs
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// On-chain balances are arbitrary-precision unsigned integers.
pub type Balance = U256;

/// A configured RPC endpoint record for one chain.
///
/// Loaded once at startup from the `ChainNodes` table and immutable for the
/// process lifetime (a restart or `reset()` picks up changes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainNode {
    pub id: i32,
    pub url: String,
    pub eth_chain_id: Option<i64>,
    pub alt_wallet_url: Option<String>,
    pub private_url: Option<String>,
    pub balance_type: Option<BalanceType>,
    pub name: String,
    pub description: Option<String>,
}

impl ChainNode {
    /// URL the balance providers should talk to: the private endpoint when
    /// one is configured, the public one otherwise.
    pub fn fetch_url(&self) -> &str {
        self.private_url.as_deref().unwrap_or(&self.url)
    }
}

/// Chain family tag carried on a `ChainNode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceType {
    Ethereum,
    Cosmos,
}

impl BalanceType {
    /// Parse the tag as stored in the `balance_type` column. Unknown tags
    /// map to `None` so a bad row surfaces as `BalanceTypeMissing` instead
    /// of failing the whole registry load.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ethereum" => Some(Self::Ethereum),
            "cosmos" => Some(Self::Cosmos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Cosmos => "cosmos",
        }
    }
}

/// Token standard of a contract-based balance source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Erc20,
    Erc721,
}

/// Where a requirement's balance comes from.
///
/// Serialized with the `source_type` tag used by the group-management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source_type")]
pub enum BalanceSource {
    #[serde(rename = "erc20")]
    Erc20 {
        evm_chain_id: i64,
        contract_address: String,
    },
    #[serde(rename = "erc721")]
    Erc721 {
        evm_chain_id: i64,
        contract_address: String,
    },
    #[serde(rename = "eth_native")]
    EthNative { evm_chain_id: i64 },
    #[serde(rename = "cosmos_native")]
    CosmosNative { cosmos_chain_id: String },
}

/// One weighted membership rule supplied per evaluation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Requirement {
    Threshold { data: ThresholdData },
}

/// Payload of a threshold rule: the user's balance at `source` must be
/// strictly greater than `threshold` (a decimal string, since thresholds
/// routinely exceed u64).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdData {
    pub threshold: String,
    pub source: BalanceSource,
}

/// Verdict of one membership evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub is_valid: bool,
    pub num_requirements_met: usize,
}

/// Tunable knobs for the balance cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Prune interval; also the effective lifetime of zero balances, which
    /// are evicted on every pass.
    pub no_balance_ttl: Duration,
    /// Lifetime of non-zero balances; evicted strictly after it elapses.
    pub has_balance_ttl: Duration,
    /// Upper bound on any single provider fetch.
    pub fetch_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            no_balance_ttl: Duration::from_secs(300),
            has_balance_ttl: Duration::from_secs(86_400),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl CacheConfig {
    pub fn with_no_balance_ttl(mut self, ttl: Duration) -> Self {
        self.no_balance_ttl = ttl;
        self
    }

    pub fn with_has_balance_ttl(mut self, ttl: Duration) -> Self {
        self.has_balance_ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}
