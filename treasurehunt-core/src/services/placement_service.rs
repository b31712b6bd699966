// File: treasurehunt-core/src/services/placement_service.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use chrono::Utc;
use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;
use treasurehunt_common::models::{
    BlockLocation, PendingPlacement, PlacementOutcome, PlayerRef, TreasureDefinition,
};
use treasurehunt_common::traits::{GameHost, MessageResolver};
use crate::cache::TreasureCache;
use crate::repositories::TreasureStore;

/// Tracks admins who issued `create` and are expected to click a block.
///
/// Per player: NONE -> PENDING -> (PLACED | EXPIRED). Removing the entry from
/// `pending` is what decides the outcome, so whichever of "click" and
/// "timer" removes it first wins and the other finds nothing to do.
pub struct PlacementCoordinator {
    pending: DashMap<Uuid, PendingPlacement>,
    next_ticket: AtomicU64,
    store: TreasureStore,
    cache: Arc<TreasureCache>,
    host: Arc<dyn GameHost>,
    messages: Arc<dyn MessageResolver>,
    runtime: Handle,
}

impl PlacementCoordinator {
    pub fn new(
        store: TreasureStore,
        cache: Arc<TreasureCache>,
        host: Arc<dyn GameHost>,
        messages: Arc<dyn MessageResolver>,
        runtime: Handle,
    ) -> Self {
        Self {
            pending: DashMap::new(),
            next_ticket: AtomicU64::new(1),
            store,
            cache,
            host,
            messages,
            runtime,
        }
    }

    pub fn is_pending(&self, player: Uuid) -> bool {
        self.pending.contains_key(&player)
    }

    pub fn pending_for(&self, player: Uuid) -> Option<PendingPlacement> {
        self.pending.get(&player).map(|p| p.value().clone())
    }

    /// Puts `player` into placement mode for `treasure_id`, replacing any request
    /// they already had open.
    ///
    /// The returned handle resolves to `Some(PlacementOutcome::Expired)` if this
    /// request timed out, or `None` if it was placed or superseded first.
    pub fn begin_placement(
        self: &Arc<Self>,
        player: &PlayerRef,
        treasure_id: &str,
        command: &str,
        timeout: Duration,
    ) -> JoinHandle<Option<PlacementOutcome>> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let placement = PendingPlacement {
            treasure_id: treasure_id.to_string(),
            command: command.to_string(),
            ticket,
            requested_at: Utc::now(),
        };

        if let Some(previous) = self.pending.insert(player.id, placement) {
            debug!(
                player = %player.name,
                "Replacing pending placement of '{}' with '{}'", previous.treasure_id, treasure_id
            );
        }

        let seconds = timeout.as_secs();
        let seconds_text = seconds.to_string();
        self.host.show_title(
            player,
            &self.messages.resolve("create.title", &[]),
            &self.messages.resolve("create.subtitle", &[]),
            seconds,
        );
        self.host.send_message(
            player,
            &self.messages.resolve("create.info-message", &[("seconds", seconds_text.as_str())]),
        );
        info!(player = %player.name, "Waiting {}s for placement of treasure '{}'", seconds, treasure_id);

        let this = Arc::clone(self);
        let player = player.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            this.expire(&player, ticket)
        })
    }

    /// Drops the request if it is still the one identified by `ticket`.
    fn expire(&self, player: &PlayerRef, ticket: u64) -> Option<PlacementOutcome> {
        let (_, placement) = self.pending.remove_if(&player.id, |_, p| p.ticket == ticket)?;

        info!(player = %player.name, "Placement of treasure '{}' timed out", placement.treasure_id);
        self.host.clear_title(player);
        self.host.send_message(player, &self.messages.resolve("create.timeout", &[]));
        Some(PlacementOutcome::Expired { treasure_id: placement.treasure_id })
    }

    /// Consumes the player's pending request, if any, and binds it to `location`.
    ///
    /// `None` means the player was not placing anything and the click belongs to
    /// someone else. `Some` means the click was taken by placement (the caller
    /// must suppress it) and the handle resolves once the store answered.
    pub fn on_world_interaction(
        self: &Arc<Self>,
        player: &PlayerRef,
        location: &BlockLocation,
    ) -> Option<JoinHandle<PlacementOutcome>> {
        let (_, placement) = self.pending.remove(&player.id)?;

        let this = Arc::clone(self);
        let player = player.clone();
        let location = location.clone();
        Some(self.runtime.spawn(async move {
            this.finish_placement(&player, placement, location).await
        }))
    }

    async fn finish_placement(
        &self,
        player: &PlayerRef,
        placement: PendingPlacement,
        location: BlockLocation,
    ) -> PlacementOutcome {
        let treasure = TreasureDefinition::new(placement.treasure_id, location, placement.command);

        let outcome = if self.store.upsert_treasure(treasure.clone()).await {
            self.cache.put(treasure.clone());
            let loc = &treasure.location;
            let (x, y, z) = (loc.x.to_string(), loc.y.to_string(), loc.z.to_string());
            self.host.send_message(
                player,
                &self.messages.resolve(
                    "create.success",
                    &[
                        ("id", treasure.treasure_id.as_str()),
                        ("world", loc.world.as_str()),
                        ("x", x.as_str()),
                        ("y", y.as_str()),
                        ("z", z.as_str()),
                    ],
                ),
            );
            info!(player = %player.name, "Treasure '{}' placed at {}", treasure.treasure_id, loc);
            PlacementOutcome::Placed(treasure)
        } else {
            warn!(player = %player.name, "Could not store treasure '{}'", treasure.treasure_id);
            self.host.send_message(player, &self.messages.resolve("create.error", &[]));
            PlacementOutcome::Failed { treasure_id: treasure.treasure_id }
        };

        self.host.clear_title(player);
        outcome
    }
}
