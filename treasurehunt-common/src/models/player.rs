// File: treasurehunt-common/src/models/player.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: Uuid,
    pub name: String,
}

impl PlayerRef {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Who issued an admin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    Console,
    Player(PlayerRef),
}
