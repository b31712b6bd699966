// File: treasurehunt-core/tests/test_utils/mod.rs
#![allow(dead_code)]

use std::sync::Arc;
use async_trait::async_trait;
use mockall::mock;
use uuid::Uuid;
use treasurehunt_core::Error;
use treasurehunt_core::config::MessagesConfig;
use treasurehunt_core::messages::MessageCatalog;
use treasurehunt_core::models::{BlockLocation, RedemptionRecord, TreasureDefinition};
use treasurehunt_core::traits::{MessageResolver, TreasureRepository};

mock! {
    pub Repo {}
    #[async_trait]
    impl TreasureRepository for Repo {
        async fn ensure_schema(&self) -> Result<(), Error>;
        async fn upsert_treasure(&self, treasure: &TreasureDefinition) -> Result<(), Error>;
        async fn delete_treasure(&self, treasure_id: &str) -> Result<(u64, u64), Error>;
        async fn list_all_treasures(&self) -> Result<Vec<TreasureDefinition>, Error>;
        async fn add_redemption(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error>;
        async fn remove_redemption(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error>;
        async fn is_redeemed(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error>;
        async fn list_redeemed_for_player(&self, player: Uuid) -> Result<Vec<String>, Error>;
        async fn list_redemptions_for_treasure(&self, treasure_id: &str) -> Result<Vec<RedemptionRecord>, Error>;
        async fn close(&self);
    }
}

pub fn unavailable() -> Error {
    Error::Database(sqlx::Error::PoolClosed)
}

pub fn chest(id: &str, x: i32, y: i32, z: i32) -> TreasureDefinition {
    TreasureDefinition::new(id, BlockLocation::new("world", x, y, z), "give %player% diamond 1")
}

pub fn default_messages() -> Arc<dyn MessageResolver> {
    Arc::new(MessageCatalog::new(&MessagesConfig::default()))
}

pub fn resolve(key: &str, placeholders: &[(&str, &str)]) -> String {
    default_messages().resolve(key, placeholders)
}
