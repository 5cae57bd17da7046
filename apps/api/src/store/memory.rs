use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::cache::ExpiringCache;
use super::{Lookup, ResultStore, StoreError};
use crate::evaluation::models::AnalysisOutcome;

/// In-process store. Results are lost on restart.
#[derive(Clone)]
pub struct MemoryResultStore {
    cache: Arc<ExpiringCache<Uuid, AnalysisOutcome>>,
}

impl MemoryResultStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(ExpiringCache::new(ttl)),
        }
    }

    /// Shared handle for the background sweeper.
    pub fn cache(&self) -> Arc<ExpiringCache<Uuid, AnalysisOutcome>> {
        Arc::clone(&self.cache)
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn put(&self, id: Uuid, outcome: AnalysisOutcome) -> Result<(), StoreError> {
        self.cache.insert(id, outcome);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Lookup<AnalysisOutcome>, StoreError> {
        Ok(self.cache.get(&id))
    }
}
