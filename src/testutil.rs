// src/testutil.rs
//! Shared mocks for module tests: a canned node store and a counting
//! balance provider.

use crate::error::{GateError, GateResult};
use crate::provider::{BalanceProvider, FetchParams};
use crate::registry::NodeStore;
use crate::types::{Balance, BalanceType, ChainNode};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) fn test_node(id: i32, eth_chain_id: Option<i64>) -> ChainNode {
    let balance_type = if eth_chain_id.is_some() {
        BalanceType::Ethereum
    } else {
        BalanceType::Cosmos
    };
    ChainNode {
        id,
        url: format!("https://rpc-{id}.example"),
        eth_chain_id,
        alt_wallet_url: None,
        private_url: None,
        balance_type: Some(balance_type),
        name: format!("chain-{id}"),
        description: None,
    }
}

/// Node store serving canned batches. Each `load_nodes` call consumes the
/// next batch; the last batch is reused once the queue runs dry, so a store
/// built with one batch behaves like a static table.
pub(crate) struct StaticNodeStore {
    batches: Mutex<Vec<Vec<ChainNode>>>,
    fail: bool,
}

impl StaticNodeStore {
    pub(crate) fn new(nodes: Vec<ChainNode>) -> Self {
        Self {
            batches: Mutex::new(vec![nodes]),
            fail: false,
        }
    }

    /// First load returns `initial`, every later load returns `reloaded`.
    pub(crate) fn with_reload(initial: Vec<ChainNode>, reloaded: Vec<ChainNode>) -> Self {
        Self {
            batches: Mutex::new(vec![initial, reloaded]),
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl NodeStore for StaticNodeStore {
    async fn load_nodes(&self) -> GateResult<Vec<ChainNode>> {
        if self.fail {
            return Err(GateError::Database(sqlx::Error::PoolClosed));
        }
        let mut batches = self.batches.lock().unwrap();
        if batches.len() > 1 {
            Ok(batches.remove(0))
        } else {
            Ok(batches.first().cloned().unwrap_or_default())
        }
    }
}

/// Balance provider returning canned values while counting calls, so tests
/// can assert that cache hits perform no network I/O.
pub(crate) struct MockProvider {
    default: Balance,
    per_contract: HashMap<String, Balance>,
    fail: bool,
    calls: AtomicUsize,
    last_rpc_url: Mutex<Option<String>>,
}

impl MockProvider {
    pub(crate) fn returning(balance: Balance) -> Self {
        Self {
            default: balance,
            per_contract: HashMap::new(),
            fail: false,
            calls: AtomicUsize::new(0),
            last_rpc_url: Mutex::new(None),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(Balance::ZERO)
        }
    }

    /// Override the balance returned for one contract address.
    pub(crate) fn with_contract_balance(mut self, contract: &str, balance: Balance) -> Self {
        self.per_contract.insert(contract.to_string(), balance);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_rpc_url(&self) -> Option<String> {
        self.last_rpc_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl BalanceProvider for MockProvider {
    async fn fetch(&self, params: FetchParams<'_>) -> GateResult<Balance> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_rpc_url.lock().unwrap() = Some(params.rpc_url.to_string());

        if self.fail {
            return Err(GateError::ProviderFetchFailed("mock failure".to_string()));
        }

        Ok(params
            .contract_address
            .and_then(|c| self.per_contract.get(c).copied())
            .unwrap_or(self.default))
    }
}
