// File: treasurehunt-core/src/services/treasure_service.rs

use std::sync::Arc;
use tracing::info;
use treasurehunt_common::models::DeleteOutcome;
use crate::cache::{TreasureCache, TreasureSnapshot};
use crate::repositories::TreasureStore;

/// Administrative mutations that must keep the cache in step with the store.
pub struct TreasureService {
    store: TreasureStore,
    cache: Arc<TreasureCache>,
}

impl TreasureService {
    pub fn new(store: TreasureStore, cache: Arc<TreasureCache>) -> Self {
        Self { store, cache }
    }

    /// Cascading delete. The cache entry is only dropped once the store committed.
    pub async fn delete_treasure(&self, treasure_id: &str) -> DeleteOutcome {
        let outcome = self.store.delete_treasure(treasure_id).await;
        match outcome {
            DeleteOutcome::Deleted { redemptions } => {
                self.cache.remove(treasure_id);
                info!("Deleted treasure '{}' and {} redemption(s)", treasure_id, redemptions);
            }
            DeleteOutcome::NotFound => {
                // stale entry from an out-of-band delete
                self.cache.remove(treasure_id);
            }
            DeleteOutcome::Failed => {}
        }
        outcome
    }

    pub async fn reload(&self) -> Option<usize> {
        self.cache.load(&self.store).await
    }

    pub fn list(&self) -> Arc<TreasureSnapshot> {
        self.cache.snapshot()
    }

    pub fn ids(&self) -> Vec<String> {
        self.cache.ids()
    }
}
