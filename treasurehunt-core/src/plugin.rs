// File: treasurehunt-core/src/plugin.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{error, info};
use treasurehunt_common::traits::{GameHost, MessageResolver, TreasureRepository};
use crate::cache::TreasureCache;
use crate::config::TreasureHuntConfig;
use crate::db;
use crate::messages::MessageCatalog;
use crate::repositories::TreasureStore;
use crate::services::{
    CommandService, InteractionService, PlacementCoordinator, RedemptionEngine, TreasureService,
};
use crate::Error;

/// Every component of the plugin, built once and shared by `Arc`.
pub struct TreasureHunt {
    pub store: TreasureStore,
    pub cache: Arc<TreasureCache>,
    pub placement: Arc<PlacementCoordinator>,
    pub redemption: Arc<RedemptionEngine>,
    pub treasures: Arc<TreasureService>,
    pub interactions: InteractionService,
    pub commands: CommandService,
}

impl TreasureHunt {
    /// Connects to the configured database and wires everything together.
    ///
    /// Only a malformed database url is an error. An unreachable database is
    /// logged and leaves a plugin whose store calls all fail safely.
    pub async fn start(config: &TreasureHuntConfig, host: Arc<dyn GameHost>) -> Result<Self, Error> {
        let repo = db::connect(&config.settings.database)?;
        Ok(Self::with_repository(config, host, repo).await)
    }

    /// Same as [`TreasureHunt::start`] with an already built repository.
    pub async fn with_repository(
        config: &TreasureHuntConfig,
        host: Arc<dyn GameHost>,
        repo: Arc<dyn TreasureRepository>,
    ) -> Self {
        let runtime = Handle::current();
        let messages: Arc<dyn MessageResolver> = Arc::new(MessageCatalog::new(&config.messages));

        let store = TreasureStore::new(repo);
        if !store.ensure_schema().await {
            error!("TreasureHunt starts without a working database");
        }

        let cache = Arc::new(TreasureCache::new());
        cache.load(&store).await;

        let placement = Arc::new(PlacementCoordinator::new(
            store.clone(),
            Arc::clone(&cache),
            Arc::clone(&host),
            Arc::clone(&messages),
            runtime.clone(),
        ));
        let redemption = Arc::new(RedemptionEngine::new(
            store.clone(),
            Arc::clone(&cache),
            Arc::clone(&host),
            Arc::clone(&messages),
        ));
        let treasures = Arc::new(TreasureService::new(store.clone(), Arc::clone(&cache)));

        let interactions = InteractionService::new(
            Arc::clone(&placement),
            Arc::clone(&redemption),
            Arc::clone(&cache),
            runtime,
        );
        let commands = CommandService::new(
            Arc::clone(&placement),
            Arc::clone(&redemption),
            Arc::clone(&treasures),
            host,
            messages,
            Duration::from_secs(config.settings.creation_timeout_secs),
            config.settings.admin_permission.clone(),
        );

        info!("TreasureHunt started with {} treasures", cache.len());
        Self {
            store,
            cache,
            placement,
            redemption,
            treasures,
            interactions,
            commands,
        }
    }

    pub async fn shutdown(&self) {
        self.store.close().await;
        info!("TreasureHunt stopped");
    }
}
