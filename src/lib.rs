// src/lib.rs
pub mod cache;
pub mod error;
pub mod evaluator;
pub mod provider;
pub mod registry;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use cache::{BalanceCache, CacheEntry, CacheKey};
pub use error::{GateError, GateResult};
pub use evaluator::RequirementsEvaluator;
pub use provider::{BalanceProvider, FetchParams, ProviderKey, ProviderRegistry};
pub use registry::{ChainNodeRegistry, NodeStore, PgNodeStore};
pub use types::{
    Balance, BalanceSource, BalanceType, CacheConfig, ChainNode, ContractType, EvaluationResult,
    Requirement, ThresholdData,
};

use sqlx::PgPool;
use std::sync::Arc;

/// Facade over the token-gating engine: node registry, balance cache, and
/// requirements evaluator, wired together with one lifecycle.
///
/// The web layer hands this an address and a requirement set and renders the
/// verdict as an access-gate decision.
#[derive(Clone)]
pub struct TokenGate {
    cache: Arc<BalanceCache>,
}

impl TokenGate {
    /// Connect against the relational store holding the `ChainNodes` table
    /// and start the pruning task. Fails (and should abort startup) when the
    /// bulk node read fails.
    pub async fn connect(pool: PgPool, config: CacheConfig) -> GateResult<Self> {
        let providers = Arc::new(ProviderRegistry::new(config.fetch_timeout));
        Self::with_store(Arc::new(PgNodeStore::new(pool)), providers, config).await
    }

    /// Build from explicit collaborators. This is the dependency-injection
    /// seam tests use to run against mock stores and providers.
    pub async fn with_store(
        store: Arc<dyn NodeStore>,
        providers: Arc<ProviderRegistry>,
        config: CacheConfig,
    ) -> GateResult<Self> {
        let cache = Arc::new(BalanceCache::new(store, providers, config).await?);
        cache.start().await;
        Ok(Self { cache })
    }

    /// Evaluate a requirement set for an address.
    pub async fn check_membership(
        &self,
        address: &str,
        requirements: &[Requirement],
        num_required: Option<usize>,
    ) -> EvaluationResult {
        RequirementsEvaluator::evaluate(address, requirements, &self.cache, num_required).await
    }

    /// Direct access to the balance cache for callers that gate on a single
    /// balance rather than a requirement set.
    pub fn cache(&self) -> &BalanceCache {
        &self.cache
    }

    /// Cold-cache reset: clear every entry and re-read the node table.
    pub async fn reset(&self) -> GateResult<()> {
        self.cache.reset().await
    }

    pub async fn close(&self) {
        self.cache.close().await;
    }

    /// Health check
    pub async fn health_check(&self) -> GateResult<()> {
        if self.cache.registry_len().await == 0 {
            return Err(GateError::HealthCheck(
                "chain node registry is empty".to_string(),
            ));
        }
        if !self.cache.pruner_running().await {
            return Err(GateError::HealthCheck("pruner is not running".to_string()));
        }
        Ok(())
    }
}
