// src/cache/mod.rs
pub mod pruner;

use crate::error::{GateError, GateResult};
use crate::provider::{FetchParams, ProviderKey, ProviderRegistry};
use crate::registry::{ChainNodeRegistry, NodeStore};
use crate::types::{Balance, CacheConfig, ContractType};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Composite key for one cached balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub node_id: i32,
    pub address: String,
    pub contract_address: Option<String>,
}

/// A cached balance and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub balance: Balance,
    pub fetched_at: DateTime<Utc>,
}

pub(crate) type EntryMap = HashMap<CacheKey, CacheEntry>;

/// TTL-aware balance cache over the provider pipeline.
///
/// Hits are served straight from the in-memory map with no network I/O.
/// Misses resolve the owning chain node, fetch through the matching
/// `BalanceProvider` outside the map lock, then re-enter the lock only to
/// commit the result. Two racing misses on the same key may both fetch and
/// both commit; the overwrite is idempotent, so the race is tolerated rather
/// than deduplicated.
pub struct BalanceCache {
    entries: Arc<RwLock<EntryMap>>,
    registry: RwLock<ChainNodeRegistry>,
    store: Arc<dyn NodeStore>,
    providers: Arc<ProviderRegistry>,
    config: CacheConfig,
    pruner: Mutex<Option<JoinHandle<()>>>,
}

impl BalanceCache {
    /// Build a cache, performing the one-time bulk registry load. A store
    /// failure here must abort startup; running with an empty registry would
    /// mis-attribute chain RPCs.
    pub async fn new(
        store: Arc<dyn NodeStore>,
        providers: Arc<ProviderRegistry>,
        config: CacheConfig,
    ) -> GateResult<Self> {
        let registry = ChainNodeRegistry::load(store.as_ref()).await?;

        Ok(Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            registry: RwLock::new(registry),
            store,
            providers,
            config,
            pruner: Mutex::new(None),
        })
    }

    /// Spawn the background pruning task. Idempotent.
    pub async fn start(&self) {
        let mut guard = self.pruner.lock().await;
        if guard.is_some() {
            return;
        }
        *guard = Some(tokio::spawn(pruner::run(
            Arc::clone(&self.entries),
            self.config.clone(),
        )));
        tracing::info!("balance cache pruner started");
    }

    /// Look up a balance, fetching and backfilling on a miss.
    ///
    /// `contract_address` and `contract_type` must be supplied together;
    /// violating that is a caller error rejected before any I/O.
    pub async fn get_balance(
        &self,
        node_id: i32,
        address: &str,
        contract_address: Option<&str>,
        contract_type: Option<ContractType>,
    ) -> GateResult<Balance> {
        if contract_address.is_some() != contract_type.is_some() {
            return Err(GateError::InvalidArguments(
                "contract address and contract type must be supplied together".to_string(),
            ));
        }

        let key = CacheKey {
            node_id,
            address: address.to_string(),
            contract_address: contract_address.map(str::to_string),
        };

        if let Some(entry) = self.entries.read().await.get(&key) {
            return Ok(entry.balance);
        }

        // Resolve the owning node before going to the network.
        let (provider_key, fetch_url) = {
            let registry = self.registry.read().await;
            let node = registry.get(node_id)?;
            let balance_type = node
                .balance_type
                .ok_or(GateError::BalanceTypeMissing(node_id))?;
            (
                ProviderKey::resolve(balance_type, contract_type)?,
                node.fetch_url().to_string(),
            )
        };

        // The slow RPC call happens with no lock held.
        let params = FetchParams {
            address,
            rpc_url: &fetch_url,
            contract_address,
        };
        let balance = self.providers.fetch(provider_key, params).await?;

        // Re-enter the critical section only to commit. A failed fetch never
        // reaches this point, so errors cannot poison the cache.
        self.entries.write().await.insert(
            key,
            CacheEntry {
                balance,
                fetched_at: Utc::now(),
            },
        );

        Ok(balance)
    }

    /// Resolve an EVM chain id to the node that serves it.
    pub async fn node_id_for_eth_chain(&self, chain_id: i64) -> GateResult<i32> {
        let registry = self.registry.read().await;
        registry
            .by_eth_chain_id(chain_id)
            .map(|n| n.id)
            .ok_or_else(|| GateError::NodeNotFound(format!("evm chain id {chain_id}")))
    }

    /// Resolve a node by name (used for cosmos chain ids).
    pub async fn node_id_for_name(&self, name: &str) -> GateResult<i32> {
        let registry = self.registry.read().await;
        registry
            .by_name(name)
            .map(|n| n.id)
            .ok_or_else(|| GateError::NodeNotFound(format!("chain {name:?}")))
    }

    /// Stop the pruner, drop every entry, reload the node registry, and
    /// restart the pruner if it was running. In-flight fetches that complete
    /// after the clear may repopulate the cache; that is accepted.
    pub async fn reset(&self) -> GateResult<()> {
        let was_running = {
            let mut guard = self.pruner.lock().await;
            match guard.take() {
                Some(handle) => {
                    handle.abort();
                    true
                }
                None => false,
            }
        };

        self.entries.write().await.clear();

        let fresh = ChainNodeRegistry::load(self.store.as_ref()).await?;
        *self.registry.write().await = fresh;

        if was_running {
            self.start().await;
        }
        tracing::info!("balance cache reset");
        Ok(())
    }

    /// Stop the pruner. The cache itself stays usable.
    pub async fn close(&self) {
        if let Some(handle) = self.pruner.lock().await.take() {
            handle.abort();
        }
    }

    /// Whether the pruning task is currently running.
    pub async fn pruner_running(&self) -> bool {
        self.pruner.lock().await.is_some()
    }

    /// Number of nodes currently in the registry.
    pub async fn registry_len(&self) -> usize {
        self.registry.read().await.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> Arc<RwLock<EntryMap>> {
        Arc::clone(&self.entries)
    }
}
