// src/registry/store.rs
use crate::error::GateResult;
use crate::types::{BalanceType, ChainNode};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// Source of chain node records. The cache keeps a handle to it so
/// `reset()` can re-read the table without restarting the process.
#[async_trait]
pub trait NodeStore: Send + Sync {
    async fn load_nodes(&self) -> GateResult<Vec<ChainNode>>;
}

/// Postgres-backed node store reading the `ChainNodes` table.
#[derive(Clone)]
pub struct PgNodeStore {
    pool: PgPool,
}

impl PgNodeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NodeStore for PgNodeStore {
    async fn load_nodes(&self) -> GateResult<Vec<ChainNode>> {
        let rows = sqlx::query(
            r#"SELECT id, url, eth_chain_id, alt_wallet_url, private_url,
                      balance_type, name, description
               FROM "ChainNodes""#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            let balance_type: Option<String> = row.try_get("balance_type")?;
            nodes.push(ChainNode {
                id: row.try_get("id")?,
                url: row.try_get("url")?,
                eth_chain_id: row.try_get("eth_chain_id")?,
                alt_wallet_url: row.try_get("alt_wallet_url")?,
                private_url: row.try_get("private_url")?,
                // Unknown tags load as None and surface per-node as
                // BalanceTypeMissing rather than failing the whole load.
                balance_type: balance_type.as_deref().and_then(BalanceType::parse),
                name: row.try_get("name")?,
                description: row.try_get("description")?,
            });
        }

        Ok(nodes)
    }
}
