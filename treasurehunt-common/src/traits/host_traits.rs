use uuid::Uuid;
use crate::models::PlayerRef;

/// The game server this plugin runs inside.
///
/// Every method is called from tokio worker threads; an implementation that
/// needs its own main thread (command dispatch, titles) must hop there itself.
pub trait GameHost: Send + Sync {
    fn send_message(&self, player: &PlayerRef, message: &str);

    fn show_title(&self, player: &PlayerRef, title: &str, subtitle: &str, seconds: u64);

    fn clear_title(&self, player: &PlayerRef);

    /// Runs `command` with console privileges.
    fn dispatch_as_console(&self, command: &str);

    fn has_capability(&self, player: &PlayerRef, capability: &str) -> bool;

    /// Best-effort display name lookup for offline players.
    fn resolve_player_name(&self, player: Uuid) -> Option<String>;

    /// Messages addressed to the console sender.
    fn send_console_message(&self, message: &str);
}

/// Localized string lookup with `%name%` placeholder substitution.
pub trait MessageResolver: Send + Sync {
    fn resolve(&self, key: &str, placeholders: &[(&str, &str)]) -> String;
}
