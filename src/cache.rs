//! In-memory caching using moka
//!
//! Holds the family-type reference table and package snapshots. Family types
//! change rarely and are refreshed in the background; package snapshots are
//! short-lived so price edits upstream show up quickly.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::pricing::family::FamilyType;
use crate::pricing::queries;
use crate::pricing::types::Package;

const FAMILY_TYPES_KEY: &str = "family_types";

/// Application cache holding reference data and package snapshots
#[derive(Clone)]
pub struct AppCache {
    /// Family-type table (singleton, table order preserved)
    pub family_types: Cache<String, Arc<Vec<FamilyType>>>,
    /// Package snapshots (package id -> Package)
    pub packages: Cache<Uuid, Arc<Package>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Family types: 1 entry, 1 hour TTL (warmer refreshes it sooner)
            family_types: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(60 * 60))
                .build(),

            // Packages: 1000 entries, 5 min TTL, 2 min idle
            packages: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(5 * 60))
                .time_to_idle(Duration::from_secs(2 * 60))
                .build(),
        }
    }

    pub async fn get_family_types(&self) -> Option<Arc<Vec<FamilyType>>> {
        self.family_types.get(FAMILY_TYPES_KEY).await
    }

    pub async fn set_family_types(&self, table: Vec<FamilyType>) {
        self.family_types
            .insert(FAMILY_TYPES_KEY.to_string(), Arc::new(table))
            .await;
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            family_types_cached: self.family_types.entry_count() > 0,
            packages_size: self.packages.entry_count(),
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub family_types_cached: bool,
    pub packages_size: u64,
}

/// Start background cache warmer
///
/// Loads the family-type table on startup and refreshes it every `every`.
pub async fn start_cache_warmer(cache: AppCache, crm: PgPool, every: Duration) {
    let mut interval = interval(every);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &crm).await;
    }
}

/// Warm the cache with the family-type table
async fn warm_cache(cache: &AppCache, crm: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::get_family_types(crm).await {
        Ok(rows) => {
            let table: Vec<FamilyType> = rows.into_iter().map(FamilyType::from).collect();
            info!("Loaded {} family types", table.len());
            cache.set_family_types(table).await;
        }
        Err(e) => warn!("Failed to warm family type cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_family_types_round_trip_through_cache() {
        let cache = AppCache::new();
        assert!(cache.get_family_types().await.is_none());

        cache.set_family_types(vec![FamilyType::fallback()]).await;
        let table = cache.get_family_types().await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].id, "SD");
    }
}
