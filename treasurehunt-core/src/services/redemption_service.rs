// File: treasurehunt-core/src/services/redemption_service.rs

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use treasurehunt_common::models::{ClaimOutcome, PlayerRef, TreasureDefinition};
use treasurehunt_common::traits::{GameHost, MessageResolver};
use crate::cache::TreasureCache;
use crate::repositories::TreasureStore;

/// Records claims and fires the bound command exactly once per successful claim.
pub struct RedemptionEngine {
    store: TreasureStore,
    cache: Arc<TreasureCache>,
    host: Arc<dyn GameHost>,
    messages: Arc<dyn MessageResolver>,
}

impl RedemptionEngine {
    pub fn new(
        store: TreasureStore,
        cache: Arc<TreasureCache>,
        host: Arc<dyn GameHost>,
        messages: Arc<dyn MessageResolver>,
    ) -> Self {
        Self { store, cache, host, messages }
    }

    /// Attempts to record `player`'s claim of `treasure_id`.
    ///
    /// `false` covers an unknown treasure, an existing claim and a store failure
    /// alike. The unique (player, treasure) constraint in the store is what makes
    /// concurrent calls safe, and the insert only lands while the treasure row
    /// still exists, so a cache entry outliving a delete cannot be redeemed.
    /// The command is only dispatched after the insert went through.
    pub async fn redeem(&self, player: &PlayerRef, treasure_id: &str) -> bool {
        let Some(treasure) = self.cache.lookup_by_id(treasure_id) else {
            debug!(player = %player.name, "Treasure '{}' is not cached; nothing to redeem", treasure_id);
            return false;
        };

        if !self.store.add_redemption(player.id, treasure_id).await {
            return false;
        }

        let command = treasure.render_command(&player.name);
        info!(player = %player.name, "Treasure '{}' redeemed, dispatching '{}'", treasure_id, command);
        self.host.dispatch_as_console(&command);
        true
    }

    /// The player-facing claim flow for a click on `treasure`.
    pub async fn claim(&self, player: &PlayerRef, treasure: &TreasureDefinition) -> ClaimOutcome {
        let treasure_id = treasure.treasure_id.as_str();

        // advisory only, redeem() below is what actually decides
        if self.store.is_redeemed(player.id, treasure_id).await {
            self.host.send_message(player, &self.messages.resolve("claim.already-claimed", &[]));
            return ClaimOutcome::AlreadyClaimed { treasure_id: treasure_id.to_string() };
        }

        if self.redeem(player, treasure_id).await {
            self.host.send_message(
                player,
                &self.messages.resolve("claim.success", &[("id", treasure_id)]),
            );
            ClaimOutcome::Claimed { treasure_id: treasure_id.to_string() }
        } else {
            warn!(player = %player.name, "Claim of treasure '{}' was not recorded", treasure_id);
            self.host.send_message(player, &self.messages.resolve("claim.failed", &[]));
            ClaimOutcome::Failed { treasure_id: treasure_id.to_string() }
        }
    }

    pub async fn is_redeemed(&self, player: Uuid, treasure_id: &str) -> bool {
        self.store.is_redeemed(player, treasure_id).await
    }

    /// Administrative un-redeem.
    pub async fn unredeem(&self, player: Uuid, treasure_id: &str) -> bool {
        let removed = self.store.remove_redemption(player, treasure_id).await;
        if removed {
            info!(%player, "Redemption of treasure '{}' removed", treasure_id);
        }
        removed
    }

    /// Display names of everyone who claimed `treasure_id`, oldest claim first.
    /// Players the host cannot name are listed by their UUID.
    pub async fn list_redeemers(&self, treasure_id: &str) -> Vec<String> {
        self.store
            .list_players_for_treasure(treasure_id)
            .await
            .into_iter()
            .map(|record| {
                self.host
                    .resolve_player_name(record.player_uuid)
                    .unwrap_or_else(|| record.player_uuid.to_string())
            })
            .collect()
    }

    pub async fn list_redeemed(&self, player: Uuid) -> Vec<String> {
        self.store.list_redeemed_for_player(player).await
    }
}
