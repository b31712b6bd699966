// File: treasurehunt-core/src/repositories/treasure_store.rs

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;
use treasurehunt_common::models::{DeleteOutcome, RedemptionRecord, TreasureDefinition};
use treasurehunt_common::traits::TreasureRepository;
use crate::Error;

/// Asynchronous, failure-tolerant front for a [`TreasureRepository`].
///
/// Every call runs as its own tokio task (so the caller never drives the
/// query itself) and every storage error is logged and turned into a safe
/// default: `false`, [`DeleteOutcome::Failed`] or an empty list. Nothing in
/// here returns an error to the game host.
#[derive(Clone)]
pub struct TreasureStore {
    repo: Arc<dyn TreasureRepository>,
}

impl TreasureStore {
    pub fn new(repo: Arc<dyn TreasureRepository>) -> Self {
        Self { repo }
    }

    async fn offload<T, F, Fut>(&self, operation: &'static str, fallback: T, op: F) -> T
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn TreasureRepository>) -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        match tokio::spawn(op(repo)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                error!(operation, error = %e, "Treasure store operation failed");
                fallback
            }
            Err(join_err) => {
                error!(operation, error = %join_err, "Treasure store task did not complete");
                fallback
            }
        }
    }

    /// Provisions both tables. A `false` here means the store is unusable for now and
    /// every later call will fail safely.
    pub async fn ensure_schema(&self) -> bool {
        let ok = self
            .offload("ensure_schema", false, |repo| async move {
                repo.ensure_schema().await.map(|_| true)
            })
            .await;
        if ok {
            info!("Treasure tables ensured");
        } else {
            error!("Could not provision treasure tables; store operations will fail until it is reachable");
        }
        ok
    }

    pub async fn upsert_treasure(&self, treasure: TreasureDefinition) -> bool {
        self.offload("upsert_treasure", false, move |repo| async move {
            repo.upsert_treasure(&treasure).await.map(|_| true)
        })
        .await
    }

    pub async fn delete_treasure(&self, treasure_id: impl Into<String>) -> DeleteOutcome {
        let treasure_id = treasure_id.into();
        self.offload("delete_treasure", DeleteOutcome::Failed, move |repo| async move {
            let (treasures, redemptions) = repo.delete_treasure(&treasure_id).await?;
            if treasures == 0 {
                Ok(DeleteOutcome::NotFound)
            } else {
                Ok(DeleteOutcome::Deleted { redemptions })
            }
        })
        .await
    }

    /// `None` when the read failed, as opposed to an empty table.
    pub async fn load_all_treasures(&self) -> Option<Vec<TreasureDefinition>> {
        self.offload("list_all_treasures", None, |repo| async move {
            repo.list_all_treasures().await.map(Some)
        })
        .await
    }

    pub async fn list_all_treasures(&self) -> Vec<TreasureDefinition> {
        self.load_all_treasures().await.unwrap_or_default()
    }

    /// `false` for an existing redemption, a treasure that is no longer stored,
    /// and a storage failure.
    pub async fn add_redemption(&self, player: Uuid, treasure_id: impl Into<String>) -> bool {
        let treasure_id = treasure_id.into();
        self.offload("add_redemption", false, move |repo| async move {
            let inserted = repo.add_redemption(player, &treasure_id).await?;
            if !inserted {
                debug!(%player, treasure_id = %treasure_id, "Redemption not recorded: already redeemed or treasure gone");
            }
            Ok(inserted)
        })
        .await
    }

    pub async fn remove_redemption(&self, player: Uuid, treasure_id: impl Into<String>) -> bool {
        let treasure_id = treasure_id.into();
        self.offload("remove_redemption", false, move |repo| async move {
            repo.remove_redemption(player, &treasure_id).await
        })
        .await
    }

    pub async fn is_redeemed(&self, player: Uuid, treasure_id: impl Into<String>) -> bool {
        let treasure_id = treasure_id.into();
        self.offload("is_redeemed", false, move |repo| async move {
            repo.is_redeemed(player, &treasure_id).await
        })
        .await
    }

    pub async fn list_redeemed_for_player(&self, player: Uuid) -> Vec<String> {
        self.offload("list_redeemed_for_player", Vec::new(), move |repo| async move {
            repo.list_redeemed_for_player(player).await
        })
        .await
    }

    pub async fn list_players_for_treasure(&self, treasure_id: impl Into<String>) -> Vec<RedemptionRecord> {
        let treasure_id = treasure_id.into();
        self.offload("list_players_for_treasure", Vec::new(), move |repo| async move {
            repo.list_redemptions_for_treasure(&treasure_id).await
        })
        .await
    }

    pub async fn close(&self) {
        self.repo.close().await;
        info!("Treasure store closed");
    }
}
