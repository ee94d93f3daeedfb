// src/registry/mod.rs
pub mod store;

pub use store::{NodeStore, PgNodeStore};

use crate::error::{GateError, GateResult};
use crate::types::ChainNode;
use std::collections::HashMap;

/// Read-only map of every configured chain node, keyed by node id.
///
/// Populated by one bulk read at startup and never mutated afterwards, so the
/// hot path needs no locking. A failed load must abort startup: serving
/// balances against an unknown node would silently mis-attribute chain RPCs.
#[derive(Debug, Default)]
pub struct ChainNodeRegistry {
    nodes: HashMap<i32, ChainNode>,
}

impl ChainNodeRegistry {
    /// Bulk-load all chain nodes from the backing store.
    pub async fn load(store: &dyn NodeStore) -> GateResult<Self> {
        let nodes = store.load_nodes().await?;
        tracing::info!(count = nodes.len(), "loaded chain node registry");

        Ok(Self {
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
        })
    }

    pub fn get(&self, node_id: i32) -> GateResult<&ChainNode> {
        self.nodes
            .get(&node_id)
            .ok_or_else(|| GateError::NodeNotFound(format!("node id {node_id}")))
    }

    /// Resolve an EVM chain id (e.g. 1 for mainnet) to its node record.
    pub fn by_eth_chain_id(&self, chain_id: i64) -> Option<&ChainNode> {
        self.nodes
            .values()
            .find(|n| n.eth_chain_id == Some(chain_id))
    }

    /// Resolve a node by name. Cosmos requirement sources carry a string
    /// chain id that matches the node's name.
    pub fn by_name(&self, name: &str) -> Option<&ChainNode> {
        self.nodes.values().find(|n| n.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StaticNodeStore;
    use crate::types::BalanceType;

    fn node(id: i32, eth_chain_id: Option<i64>, name: &str) -> ChainNode {
        ChainNode {
            id,
            url: format!("https://rpc-{id}.example"),
            eth_chain_id,
            alt_wallet_url: None,
            private_url: None,
            balance_type: Some(BalanceType::Ethereum),
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_load_and_lookup() {
        let store = StaticNodeStore::new(vec![
            node(1, Some(1), "ethereum"),
            node(2, Some(137), "polygon"),
        ]);

        let registry = ChainNodeRegistry::load(&store).await.unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).unwrap().name, "ethereum");
        assert_eq!(registry.by_eth_chain_id(137).unwrap().id, 2);
        assert_eq!(registry.by_name("polygon").unwrap().id, 2);
        assert!(registry.by_eth_chain_id(42161).is_none());
    }

    #[tokio::test]
    async fn test_unknown_node_is_an_error() {
        let store = StaticNodeStore::new(vec![node(1, Some(1), "ethereum")]);
        let registry = ChainNodeRegistry::load(&store).await.unwrap();

        match registry.get(99) {
            Err(GateError::NodeNotFound(_)) => {}
            other => panic!("expected NodeNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_failure_propagates() {
        let store = StaticNodeStore::failing();
        assert!(ChainNodeRegistry::load(&store).await.is_err());
    }
}
