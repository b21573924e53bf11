// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-boxed cache of the athlete's activity history.
//!
//! One shared entry; a miss or an expired entry triggers exactly one
//! refetch, even when several requests miss at the same time.

use crate::error::AppError;
use crate::models::{Activity, ActivityCollection};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Where the full activity history comes from.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn fetch_all_activities(&self) -> Result<Vec<Activity>, AppError>;
}

struct CacheEntry {
    activities: ActivityCollection,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Activity cache shared by all tool invocations.
#[derive(Clone)]
pub struct ActivityCache {
    source: Arc<dyn ActivitySource>,
    ttl: Duration,
    /// Held across a refill so concurrent misses wait for one fetch.
    entry: Arc<Mutex<Option<CacheEntry>>>,
}

impl ActivityCache {
    pub fn new(source: Arc<dyn ActivitySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the cached snapshot, refetching if absent or older than the TTL.
    pub async fn get_activities(&self) -> Result<ActivityCollection, AppError> {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(self.ttl) {
                tracing::debug!(count = cached.activities.len(), "Activity cache hit");
                return Ok(cached.activities.clone());
            }
        }

        let activities: ActivityCollection = Arc::new(self.source.fetch_all_activities().await?);
        tracing::info!(count = activities.len(), "Activity cache refilled");

        *entry = Some(CacheEntry {
            activities: activities.clone(),
            fetched_at: Instant::now(),
        });

        Ok(activities)
    }

    /// Drop the cached entry so the next call refetches.
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }
}
