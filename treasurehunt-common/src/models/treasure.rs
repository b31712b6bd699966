// File: treasurehunt-common/src/models/treasure.rs

use std::fmt;
use serde::{Deserialize, Serialize};

/// Token inside a command template that is replaced by the redeeming player's name.
pub const PLAYER_PLACEHOLDER: &str = "%player%";

/// Integer block coordinates inside a named world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockLocation {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockLocation {
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self { world: world.into(), x, y, z }
    }
}

impl fmt::Display for BlockLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{},{},{}", self.world, self.x, self.y, self.z)
    }
}

/// An admin-placed treasure: a location bound to a console command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureDefinition {
    pub treasure_id: String,
    pub location: BlockLocation,
    pub command: String,
}

impl TreasureDefinition {
    pub fn new(treasure_id: impl Into<String>, location: BlockLocation, command: impl Into<String>) -> Self {
        Self {
            treasure_id: treasure_id.into(),
            location,
            command: command.into(),
        }
    }

    pub fn is_at(&self, world: &str, x: i32, y: i32, z: i32) -> bool {
        self.location.world == world
            && self.location.x == x
            && self.location.y == y
            && self.location.z == z
    }

    /// The bound command with every `%player%` replaced by `player_name`.
    pub fn render_command(&self, player_name: &str) -> String {
        self.command.replace(PLAYER_PLACEHOLDER, player_name)
    }
}

/// Result of a cascading treasure delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The treasure row was removed along with this many redemption rows.
    Deleted { redemptions: u64 },
    /// No treasure with that id existed; nothing was changed.
    NotFound,
    /// The transaction failed and was rolled back.
    Failed,
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted { .. })
    }
}
