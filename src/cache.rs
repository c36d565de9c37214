//! Scoped, invalidated cache for the service catalog.
//!
//! The catalog changes only on admin writes, so the public listing is served
//! from a moka cache with a TTL, and every admin write invalidates it.
//! Billing paths never read through here — they always hit the store so a
//! price change can never be applied stale.

use moka::future::Cache;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::db::services as service_db;
use crate::errors::AppError;
use crate::models::services;

const ACTIVE_KEY: &str = "services:active";

#[derive(Clone)]
pub struct ServiceCatalog {
    cache: Cache<&'static str, Arc<Vec<services::Model>>>,
}

impl ServiceCatalog {
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).max_capacity(1).build();
        Self { cache }
    }

    /// TTL from `CACHE_TTL_SERVICES` (seconds), 5 minutes by default.
    pub fn from_env() -> Self {
        let secs = std::env::var("CACHE_TTL_SERVICES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);
        Self::new(Duration::from_secs(secs))
    }

    /// The active service catalog, cached until TTL or invalidation.
    pub async fn active(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Arc<Vec<services::Model>>, AppError> {
        if let Some(cached) = self.cache.get(ACTIVE_KEY).await {
            return Ok(cached);
        }

        let fresh = Arc::new(service_db::get_active_services(db).await?);
        self.cache.insert(ACTIVE_KEY, fresh.clone()).await;
        Ok(fresh)
    }

    /// Called after any admin write to the `services` table.
    pub async fn invalidate(&self) {
        self.cache.invalidate(ACTIVE_KEY).await;
    }
}
