use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{Lookup, ResultStore, StoreError};
use crate::evaluation::models::AnalysisOutcome;

const KEY_PREFIX: &str = "cvreview:result:";

/// Redis-backed store shared by every API instance.
///
/// Keys live for the TTL plus a grace period; the payload carries its own
/// `expiresAt`, so a read during the grace period reports `Expired` rather
/// than `NotFound`.
#[derive(Clone)]
pub struct RedisResultStore {
    client: redis::Client,
    ttl: Duration,
    grace: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOutcome {
    expires_at: DateTime<Utc>,
    outcome: AnalysisOutcome,
}

impl RedisResultStore {
    pub fn new(client: redis::Client, ttl: Duration, grace: Duration) -> Self {
        Self { client, ttl, grace }
    }

    fn key(id: Uuid) -> String {
        format!("{KEY_PREFIX}{id}")
    }

    fn key_ttl_secs(&self) -> u64 {
        (self.ttl + self.grace).as_secs().max(1)
    }
}

fn classify(stored: StoredOutcome, now: DateTime<Utc>) -> Lookup<AnalysisOutcome> {
    if now >= stored.expires_at {
        Lookup::Expired
    } else {
        Lookup::Found(stored.outcome)
    }
}

#[async_trait]
impl ResultStore for RedisResultStore {
    async fn put(&self, id: Uuid, outcome: AnalysisOutcome) -> Result<(), StoreError> {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::weeks(52));
        let payload = serde_json::to_string(&StoredOutcome {
            expires_at: Utc::now()
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            outcome,
        })?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(id), payload, self.key_ttl_secs())
            .await?;
        debug!("Stored result {id} in Redis");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Lookup<AnalysisOutcome>, StoreError> {
        let key = Self::key(id);
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(&key).await?;
        let Some(raw) = raw else {
            return Ok(Lookup::NotFound);
        };

        let lookup = classify(serde_json::from_str(&raw)?, Utc::now());
        if lookup == Lookup::Expired {
            conn.del::<_, ()>(&key).await?;
        }
        Ok(lookup)
    }
}
