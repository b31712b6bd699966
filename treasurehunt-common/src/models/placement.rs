// File: treasurehunt-common/src/models/placement.rs

use chrono::{DateTime, Utc};
use crate::models::treasure::TreasureDefinition;

/// An admin's declared-but-unplaced treasure, waiting for a block click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlacement {
    pub treasure_id: String,
    pub command: String,
    /// Distinguishes this request from any later one for the same player.
    pub ticket: u64,
    pub requested_at: DateTime<Utc>,
}

/// Terminal state of a placement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed(TreasureDefinition),
    /// The click was consumed but the store rejected the write.
    Failed { treasure_id: String },
    Expired { treasure_id: String },
}
