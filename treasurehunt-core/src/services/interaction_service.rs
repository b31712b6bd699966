// File: treasurehunt-core/src/services/interaction_service.rs

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use treasurehunt_common::models::{
    ClaimOutcome, InteractionHand, PlacementOutcome, WorldInteraction,
};
use crate::cache::TreasureCache;
use crate::services::placement_service::PlacementCoordinator;
use crate::services::redemption_service::RedemptionEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    Placement(PlacementOutcome),
    Claim(ClaimOutcome),
}

/// Routes block clicks to placement or to a claim.
///
/// Runs on the host's event path: it only decides and cancels, the store work
/// happens on the returned task.
pub struct InteractionService {
    placement: Arc<PlacementCoordinator>,
    redemption: Arc<RedemptionEngine>,
    cache: Arc<TreasureCache>,
    runtime: Handle,
}

impl InteractionService {
    pub fn new(
        placement: Arc<PlacementCoordinator>,
        redemption: Arc<RedemptionEngine>,
        cache: Arc<TreasureCache>,
        runtime: Handle,
    ) -> Self {
        Self { placement, redemption, cache, runtime }
    }

    /// `None` when the click is not ours and the host should process it normally.
    pub fn handle(&self, event: &mut WorldInteraction) -> Option<JoinHandle<InteractionOutcome>> {
        // a player placing a treasure never claims with the same click
        let placing_id = self.placement.pending_for(event.player.id).map(|p| p.treasure_id);
        if let Some(placing) = self.placement.on_world_interaction(&event.player, &event.location) {
            event.set_cancelled(true);
            return Some(self.runtime.spawn(async move {
                match placing.await {
                    Ok(outcome) => InteractionOutcome::Placement(outcome),
                    Err(e) => {
                        error!("Placement task failed: {}", e);
                        InteractionOutcome::Placement(PlacementOutcome::Failed {
                            treasure_id: placing_id.unwrap_or_default(),
                        })
                    }
                }
            }));
        }

        if event.hand != InteractionHand::Main {
            return None;
        }

        let loc = &event.location;
        let treasure = self.cache.lookup_by_location(&loc.world, loc.x, loc.y, loc.z)?;
        event.set_cancelled(true);
        debug!(player = %event.player.name, "Clicked treasure '{}'", treasure.treasure_id);

        let redemption = Arc::clone(&self.redemption);
        let player = event.player.clone();
        Some(self.runtime.spawn(async move {
            InteractionOutcome::Claim(redemption.claim(&player, &treasure).await)
        }))
    }
}
