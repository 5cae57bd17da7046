//! Result storage: outcomes keyed by result id, expiring a fixed TTL after
//! insertion.
//!
//! `AppState` holds an `Arc<dyn ResultStore>`, chosen at startup:
//! `MemoryResultStore` by default, `RedisResultStore` when `REDIS_URL` is set.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::evaluation::models::AnalysisOutcome;

pub mod cache;
pub mod memory;
pub mod redis_store;

pub use memory::MemoryResultStore;
pub use redis_store::RedisResultStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Stored payload is corrupt: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result of a keyed lookup. An expired entry is reported once, then removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    Found(V),
    Expired,
    NotFound,
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn put(&self, id: Uuid, outcome: AnalysisOutcome) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Lookup<AnalysisOutcome>, StoreError>;
}
