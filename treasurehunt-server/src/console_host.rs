// File: treasurehunt-server/src/console_host.rs

use std::collections::{HashMap, HashSet};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;
use treasurehunt_core::models::PlayerRef;
use treasurehunt_core::traits::GameHost;

/// A stand-in game server that prints to stdout.
///
/// Console commands are not run where they are dispatched: they are queued
/// to the console loop, which plays the part of the host's main thread.
pub struct ConsoleHost {
    players: Mutex<HashMap<String, PlayerRef>>,
    admins: Mutex<HashSet<Uuid>>,
    console_tx: mpsc::UnboundedSender<String>,
}

impl ConsoleHost {
    pub fn new(console_tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
            admins: Mutex::new(HashSet::new()),
            console_tx,
        }
    }

    /// The player called `name`, joining them on first mention.
    pub fn player(&self, name: &str) -> PlayerRef {
        self.players
            .lock()
            .entry(name.to_lowercase())
            .or_insert_with(|| PlayerRef::new(Uuid::new_v4(), name))
            .clone()
    }

    pub fn grant_admin(&self, player: &PlayerRef) {
        self.admins.lock().insert(player.id);
    }
}

impl GameHost for ConsoleHost {
    fn send_message(&self, player: &PlayerRef, message: &str) {
        println!("[{}] {}", player.name, message);
    }

    fn show_title(&self, player: &PlayerRef, title: &str, subtitle: &str, seconds: u64) {
        println!("[{}] == {} == {} ({}s)", player.name, title, subtitle, seconds);
    }

    fn clear_title(&self, player: &PlayerRef) {
        println!("[{}] (title cleared)", player.name);
    }

    fn dispatch_as_console(&self, command: &str) {
        if self.console_tx.send(command.to_string()).is_err() {
            warn!("Console loop is gone, dropping '{}'", command);
        }
    }

    fn has_capability(&self, player: &PlayerRef, _capability: &str) -> bool {
        self.admins.lock().contains(&player.id)
    }

    fn resolve_player_name(&self, player: Uuid) -> Option<String> {
        self.players
            .lock()
            .values()
            .find(|p| p.id == player)
            .map(|p| p.name.clone())
    }

    fn send_console_message(&self, message: &str) {
        println!("[console] {}", message);
    }
}
