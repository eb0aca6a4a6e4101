//! Keyed credential storage with per-entry expiry.
//!
//! Production uses Redis; `MemoryCredentialStore` backs tests and
//! single-process deployments.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Storage for signed credentials keyed by opaque handle.
///
/// A missing or expired key reads back as `None`; errors are reserved for
/// the backend itself failing.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

pub struct RedisCredentialStore {
    manager: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCredentialStore {
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)
            .map_err(|err| StoreError::Backend(format!("invalid redis url: {err}")))?;

        let manager = tokio::time::timeout(op_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Timeout(op_timeout))?
            .map_err(|err| StoreError::Backend(err.to_string()))?;

        Ok(Self {
            manager,
            op_timeout,
        })
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        tokio::time::timeout(self.op_timeout, op)
            .await
            .map_err(|_| StoreError::Timeout(self.op_timeout))?
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}

#[async_trait]
impl CredentialStore for RedisCredentialStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        self.bounded(conn.set_ex::<_, _, ()>(key, value, seconds)).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.manager.clone();
        self.bounded(conn.get::<_, Option<String>>(key)).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        self.bounded(conn.del::<_, ()>(key)).await
    }
}

/// Writes between full sweeps of expired entries.
const SWEEP_EVERY: usize = 64;

/// In-process store. Reads drop the expired entry they hit; every
/// `SWEEP_EVERY`th write sweeps the whole map, so entries nobody reads
/// again do not accumulate.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: DashMap<String, (String, Instant)>,
    writes: AtomicUsize,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entries.
    pub fn len(&self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries.get(key).is_some_and(|entry| entry.1 > now)
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, (_, expires_at)| *expires_at > now);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        if self.writes.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == 0 {
            self.purge_expired();
        }
        self.entries
            .insert(key.to_owned(), (value.to_owned(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let hit = self
            .entries
            .get(key)
            .map(|entry| (entry.0.clone(), entry.1 > now));

        match hit {
            Some((value, true)) => Ok(Some(value)),
            Some((_, false)) => {
                self.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
