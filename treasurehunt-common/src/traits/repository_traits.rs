use async_trait::async_trait;
use uuid::Uuid;
use crate::error::Error;
use crate::models::{RedemptionRecord, TreasureDefinition};

/// Durable storage for treasures and their redemptions.
///
/// Implementations surface every driver failure as `Err`; deciding what a
/// failure means for the caller is left to the store facade.
#[async_trait]
pub trait TreasureRepository: Send + Sync {
    /// Creates both tables and their indexes if they do not exist yet.
    async fn ensure_schema(&self) -> Result<(), Error>;

    /// Inserts the treasure, or replaces location and command when the id exists.
    async fn upsert_treasure(&self, treasure: &TreasureDefinition) -> Result<(), Error>;

    /// Deletes all redemptions of `treasure_id`, then the treasure itself, in one
    /// transaction. Returns `(treasure_rows, redemption_rows)`.
    async fn delete_treasure(&self, treasure_id: &str) -> Result<(u64, u64), Error>;

    async fn list_all_treasures(&self) -> Result<Vec<TreasureDefinition>, Error>;

    /// Records the redemption only while the treasure row exists, in a single
    /// statement. `Ok(false)` when the pair already exists or the treasure is gone.
    async fn add_redemption(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error>;

    /// `Ok(true)` if a row was removed.
    async fn remove_redemption(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error>;

    async fn is_redeemed(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error>;

    async fn list_redeemed_for_player(&self, player: Uuid) -> Result<Vec<String>, Error>;

    async fn list_redemptions_for_treasure(&self, treasure_id: &str) -> Result<Vec<RedemptionRecord>, Error>;

    async fn close(&self);
}
