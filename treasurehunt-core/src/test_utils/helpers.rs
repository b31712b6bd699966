// File: treasurehunt-core/src/test_utils/helpers.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use parking_lot::Mutex;
use uuid::Uuid;
use treasurehunt_common::models::PlayerRef;
use treasurehunt_common::traits::{GameHost, TreasureRepository};
use crate::config::{DatabaseConfig, TreasureHuntConfig};
use crate::db;
use crate::repositories::TreasureStore;
use crate::Error;

pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Configuration pointing at a private in-memory SQLite database.
pub fn test_config() -> TreasureHuntConfig {
    let mut config = TreasureHuntConfig::default();
    config.settings.database = DatabaseConfig {
        url: MEMORY_DATABASE_URL.to_string(),
        max_connections: 1,
        acquire_timeout_secs: 5,
    };
    config
}

/// A fresh in-memory repository with both tables created.
pub async fn create_memory_repository() -> Result<Arc<dyn TreasureRepository>, Error> {
    let repo = db::connect(&test_config().settings.database)?;
    repo.ensure_schema().await?;
    Ok(repo)
}

pub async fn create_memory_store() -> Result<TreasureStore, Error> {
    Ok(TreasureStore::new(create_memory_repository().await?))
}

pub fn player(name: &str) -> PlayerRef {
    PlayerRef::new(Uuid::new_v4(), name)
}

/// A [`GameHost`] that remembers everything the plugin asked of it.
#[derive(Default)]
pub struct RecordingHost {
    messages: Mutex<Vec<(Uuid, String)>>,
    console: Mutex<Vec<String>>,
    titles: Mutex<Vec<(Uuid, String, String, u64)>>,
    cleared_titles: Mutex<Vec<Uuid>>,
    dispatched: Mutex<Vec<String>>,
    admins: Mutex<HashSet<Uuid>>,
    names: Mutex<HashMap<Uuid, String>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Gives `player` every capability and makes their name resolvable.
    pub fn grant_admin(&self, player: &PlayerRef) {
        self.admins.lock().insert(player.id);
        self.remember(player);
    }

    pub fn remember(&self, player: &PlayerRef) {
        self.names.lock().insert(player.id, player.name.clone());
    }

    pub fn messages_for(&self, player: &PlayerRef) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(id, _)| *id == player.id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn last_message_for(&self, player: &PlayerRef) -> Option<String> {
        self.messages_for(player).pop()
    }

    pub fn console_messages(&self) -> Vec<String> {
        self.console.lock().clone()
    }

    pub fn titles_for(&self, player: &PlayerRef) -> Vec<(String, String, u64)> {
        self.titles
            .lock()
            .iter()
            .filter(|(id, ..)| *id == player.id)
            .map(|(_, title, subtitle, secs)| (title.clone(), subtitle.clone(), *secs))
            .collect()
    }

    pub fn cleared_titles_for(&self, player: &PlayerRef) -> usize {
        self.cleared_titles.lock().iter().filter(|id| **id == player.id).count()
    }

    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched.lock().clone()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
        self.console.lock().clear();
        self.titles.lock().clear();
        self.cleared_titles.lock().clear();
        self.dispatched.lock().clear();
    }
}

impl GameHost for RecordingHost {
    fn send_message(&self, player: &PlayerRef, message: &str) {
        self.messages.lock().push((player.id, message.to_string()));
    }

    fn show_title(&self, player: &PlayerRef, title: &str, subtitle: &str, seconds: u64) {
        self.titles
            .lock()
            .push((player.id, title.to_string(), subtitle.to_string(), seconds));
    }

    fn clear_title(&self, player: &PlayerRef) {
        self.cleared_titles.lock().push(player.id);
    }

    fn dispatch_as_console(&self, command: &str) {
        self.dispatched.lock().push(command.to_string());
    }

    fn has_capability(&self, player: &PlayerRef, _capability: &str) -> bool {
        self.admins.lock().contains(&player.id)
    }

    fn resolve_player_name(&self, player: Uuid) -> Option<String> {
        self.names.lock().get(&player).cloned()
    }

    fn send_console_message(&self, message: &str) {
        self.console.lock().push(message.to_string());
    }
}
