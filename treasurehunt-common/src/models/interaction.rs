// File: treasurehunt-common/src/models/interaction.rs

use crate::models::player::PlayerRef;
use crate::models::treasure::BlockLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionHand {
    Main,
    Off,
}

/// A player clicked a block. Handlers set `cancelled` to suppress the
/// host's normal interaction effect.
#[derive(Debug, Clone)]
pub struct WorldInteraction {
    pub player: PlayerRef,
    pub location: BlockLocation,
    pub hand: InteractionHand,
    cancelled: bool,
}

impl WorldInteraction {
    pub fn new(player: PlayerRef, location: BlockLocation, hand: InteractionHand) -> Self {
        Self { player, location, hand, cancelled: false }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}
