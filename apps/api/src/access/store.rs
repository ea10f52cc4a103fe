//! Quota store — pluggable, trait-based storage for request timestamps and privileged keys.
//!
//! Default: `InMemoryQuotaStore` (process-local, lost on restart).
//! `AppState` holds an `Arc<dyn QuotaStore>`, so a durable backend can be swapped in at
//! startup without touching the guard or handlers.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};

/// Result of trying to take one request from a client's daily allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// The request was recorded; `used` counts it.
    Granted { used: usize },
    Exhausted { used: usize },
}

#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Timestamps recorded for `client_id` at or after `since`. Older entries may be pruned.
    async fn recent(&self, client_id: &str, since: DateTime<Local>) -> Result<Vec<DateTime<Local>>>;

    async fn record(&self, client_id: &str, at: DateTime<Local>) -> Result<()>;

    async fn is_privileged(&self, key: &str) -> Result<bool>;

    /// Records `at` if fewer than `limit` requests exist since `since`.
    ///
    /// The default composes `recent` and `record` and is not atomic: two concurrent callers
    /// can both pass the check. Stores that can serialize should override it.
    async fn try_acquire(
        &self,
        client_id: &str,
        since: DateTime<Local>,
        at: DateTime<Local>,
        limit: usize,
    ) -> Result<Acquire> {
        let used = self.recent(client_id, since).await?.len();
        if used >= limit {
            return Ok(Acquire::Exhausted { used });
        }
        self.record(client_id, at).await?;
        Ok(Acquire::Granted { used: used + 1 })
    }
}

/// Process-local store. One mutex guards the whole table; entries are created on first use
/// and never removed, only pruned.
#[derive(Debug, Default)]
pub struct InMemoryQuotaStore {
    requests: Mutex<HashMap<String, Vec<DateTime<Local>>>>,
    privileged_keys: HashSet<String>,
}

impl InMemoryQuotaStore {
    pub fn new<I, S>(privileged_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requests: Mutex::new(HashMap::new()),
            privileged_keys: privileged_keys.into_iter().map(Into::into).collect(),
        }
    }

    fn with_table<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, Vec<DateTime<Local>>>) -> T,
    ) -> Result<T> {
        let mut table = self
            .requests
            .lock()
            .map_err(|_| anyhow!("quota table lock poisoned"))?;
        Ok(f(&mut table))
    }
}

fn prune(timestamps: &mut Vec<DateTime<Local>>, since: DateTime<Local>) {
    timestamps.retain(|t| *t >= since);
}

#[async_trait]
impl QuotaStore for InMemoryQuotaStore {
    async fn recent(&self, client_id: &str, since: DateTime<Local>) -> Result<Vec<DateTime<Local>>> {
        self.with_table(|table| {
            let timestamps = table.entry(client_id.to_string()).or_default();
            prune(timestamps, since);
            timestamps.clone()
        })
    }

    async fn record(&self, client_id: &str, at: DateTime<Local>) -> Result<()> {
        self.with_table(|table| {
            table.entry(client_id.to_string()).or_default().push(at);
        })
    }

    async fn is_privileged(&self, key: &str) -> Result<bool> {
        Ok(self.privileged_keys.contains(key))
    }

    /// Prune, check and append under a single lock acquisition.
    async fn try_acquire(
        &self,
        client_id: &str,
        since: DateTime<Local>,
        at: DateTime<Local>,
        limit: usize,
    ) -> Result<Acquire> {
        self.with_table(|table| {
            let timestamps = table.entry(client_id.to_string()).or_default();
            prune(timestamps, since);
            if timestamps.len() >= limit {
                return Acquire::Exhausted {
                    used: timestamps.len(),
                };
            }
            timestamps.push(at);
            Acquire::Granted {
                used: timestamps.len(),
            }
        })
    }
}
