// File: treasurehunt-common/src/models/mod.rs
pub mod treasure;
pub mod redemption;
pub mod placement;
pub mod player;
pub mod interaction;

pub use treasure::{BlockLocation, DeleteOutcome, TreasureDefinition, PLAYER_PLACEHOLDER};
pub use redemption::{ClaimOutcome, RedemptionRecord};
pub use placement::{PendingPlacement, PlacementOutcome};
pub use player::{CommandSender, PlayerRef};
pub use interaction::{InteractionHand, WorldInteraction};
