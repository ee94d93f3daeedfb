// src/provider/mod.rs
pub mod cosmos;
pub mod evm;

pub use cosmos::CosmosNativeProvider;
pub use evm::{Erc20Provider, Erc721Provider, EthNativeProvider};

use crate::error::{GateError, GateResult};
use crate::types::{Balance, BalanceType, ContractType};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Inputs for one balance fetch against a live RPC endpoint.
#[derive(Debug, Clone, Copy)]
pub struct FetchParams<'a> {
    pub address: &'a str,
    pub rpc_url: &'a str,
    pub contract_address: Option<&'a str>,
}

/// Per-chain-family balance fetching strategy.
///
/// All wire-level knowledge (RPC shapes, response decoding) lives behind this
/// trait; the cache only selects which implementation to call. New chain
/// families are added by implementing this trait, not by touching the cache.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    async fn fetch(&self, params: FetchParams<'_>) -> GateResult<Balance>;
}

/// Closed set of supported chain-family/contract-standard combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKey {
    EthNative,
    Erc20,
    Erc721,
    CosmosNative,
}

impl ProviderKey {
    /// Map a node's balance type plus the caller's contract type to the
    /// provider that owns that combination.
    pub fn resolve(
        balance_type: BalanceType,
        contract_type: Option<ContractType>,
    ) -> GateResult<Self> {
        match (balance_type, contract_type) {
            (BalanceType::Ethereum, None) => Ok(Self::EthNative),
            (BalanceType::Ethereum, Some(ContractType::Erc20)) => Ok(Self::Erc20),
            (BalanceType::Ethereum, Some(ContractType::Erc721)) => Ok(Self::Erc721),
            (BalanceType::Cosmos, None) => Ok(Self::CosmosNative),
            (BalanceType::Cosmos, Some(_)) => Err(GateError::UnsupportedSource(
                "token contracts on cosmos nodes".to_string(),
            )),
        }
    }
}

/// Registry binding each `ProviderKey` to its concrete provider, with a
/// uniform timeout around every fetch so one slow endpoint cannot stall the
/// cache's callers indefinitely.
pub struct ProviderRegistry {
    providers: HashMap<ProviderKey, Arc<dyn BalanceProvider>>,
    fetch_timeout: Duration,
}

impl ProviderRegistry {
    pub fn new(fetch_timeout: Duration) -> Self {
        let mut providers: HashMap<ProviderKey, Arc<dyn BalanceProvider>> = HashMap::new();
        providers.insert(ProviderKey::EthNative, Arc::new(EthNativeProvider));
        providers.insert(ProviderKey::Erc20, Arc::new(Erc20Provider));
        providers.insert(ProviderKey::Erc721, Arc::new(Erc721Provider));
        providers.insert(
            ProviderKey::CosmosNative,
            Arc::new(CosmosNativeProvider::new()),
        );

        Self {
            providers,
            fetch_timeout,
        }
    }

    /// Swap the provider behind a key. Used to inject mocks in tests.
    pub fn with_provider(mut self, key: ProviderKey, provider: Arc<dyn BalanceProvider>) -> Self {
        self.providers.insert(key, provider);
        self
    }

    pub async fn fetch(&self, key: ProviderKey, params: FetchParams<'_>) -> GateResult<Balance> {
        let provider = self
            .providers
            .get(&key)
            .ok_or_else(|| GateError::UnsupportedSource(format!("{key:?}")))?;

        match tokio::time::timeout(self.fetch_timeout, provider.fetch(params)).await {
            Ok(result) => result,
            Err(_) => Err(GateError::FetchTimeout(self.fetch_timeout.as_secs())),
        }
    }
}
