// src/cache/pruner.rs
use crate::cache::{CacheEntry, EntryMap};
use crate::types::CacheConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

/// Background pruning loop. Ticks every `no_balance_ttl` and evicts under
/// two independent policies:
///
/// - zero balances go on every pass (cheap to re-check, likely to change on
///   a first stake or mint);
/// - non-zero balances survive until strictly after `has_balance_ttl`
///   (re-fetching is expensive against rate-limited RPCs).
pub(crate) async fn run(entries: Arc<RwLock<EntryMap>>, config: CacheConfig) {
    let mut ticker = tokio::time::interval(config.no_balance_ttl);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; nothing is stale yet.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        prune(&entries, config.has_balance_ttl).await;
    }
}

/// One prune pass. Returns how many entries were evicted.
pub(crate) async fn prune(entries: &RwLock<EntryMap>, has_balance_ttl: Duration) -> usize {
    let now = Utc::now();
    let mut map = entries.write().await;
    let before = map.len();
    map.retain(|_, entry| !is_stale(entry, now, has_balance_ttl));
    let evicted = before - map.len();

    if evicted > 0 {
        tracing::debug!(evicted, remaining = map.len(), "pruned balance cache");
    }
    evicted
}

pub(crate) fn is_stale(
    entry: &CacheEntry,
    now: DateTime<Utc>,
    has_balance_ttl: Duration,
) -> bool {
    if entry.balance.is_zero() {
        return true;
    }
    match chrono::Duration::from_std(has_balance_ttl) {
        Ok(ttl) => now.signed_duration_since(entry.fetched_at) > ttl,
        // A ttl too large for chrono means the entry never goes stale.
        Err(_) => false,
    }
}
