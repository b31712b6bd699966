// File: treasurehunt-common/src/models/redemption.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable proof that a player has claimed a treasure.
/// At most one exists per (player, treasure) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionRecord {
    pub player_uuid: Uuid,
    pub treasure_id: String,
    pub redeemed_at: DateTime<Utc>,
}

/// What happened when a player clicked a treasure block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed { treasure_id: String },
    AlreadyClaimed { treasure_id: String },
    Failed { treasure_id: String },
}
