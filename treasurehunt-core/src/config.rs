//! Plugin configuration.
//!
//! Two TOML files live in the config directory:
//!
//! - `config.toml`: database connection, pool size and placement timeout
//! - `messages.toml`: the chat prefix and every player-facing template
//!
//! Missing files are written from built-in defaults on first start, and a
//! `messages.toml` that lacks newer keys is back-filled in memory.

use std::collections::BTreeMap;
use std::path::Path;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};
use crate::Error;

pub const DATABASE_URL_ENV: &str = "TREASUREHUNT_DATABASE_URL";

/// The files that make up a plugin configuration directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    Config,
    Messages,
}

impl ConfigFile {
    pub const ALL: [ConfigFile; 2] = [ConfigFile::Config, ConfigFile::Messages];

    pub fn file_name(&self) -> &'static str {
        match self {
            ConfigFile::Config => "config.toml",
            ConfigFile::Messages => "messages.toml",
        }
    }

    fn default_contents(&self) -> Result<String, Error> {
        let text = match self {
            ConfigFile::Config => toml::to_string_pretty(&Settings::default())?,
            ConfigFile::Messages => toml::to_string_pretty(&MessagesConfig::default())?,
        };
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://...` or `sqlite://...`
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://treasurehunt.db".to_string(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

fn default_max_connections() -> u32 {
    4
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_creation_timeout() -> u64 {
    30
}

fn default_admin_permission() -> String {
    "treasurehunt.admin".to_string()
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds an admin has to click a block after `create`.
    #[serde(default = "default_creation_timeout")]
    pub creation_timeout_secs: u64,
    #[serde(default = "default_admin_permission")]
    pub admin_permission: String,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            creation_timeout_secs: default_creation_timeout(),
            admin_permission: default_admin_permission(),
            database: DatabaseConfig::default(),
        }
    }
}

/// Contents of `messages.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl MessagesConfig {
    /// Adds any built-in template the loaded file does not define.
    fn fill_missing(&mut self) {
        for (key, template) in DEFAULT_MESSAGES {
            if !self.messages.contains_key(*key) {
                warn!("messages.toml has no '{}', using built-in default", key);
                self.messages.insert(key.to_string(), template.to_string());
            }
        }
    }
}

const DEFAULT_PREFIX: &str = "[TreasureHunt] ";

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("global.no-console", "{prefix}This command can only be used in game."),
    ("global.insufficient-permission", "{prefix}You do not have permission to do that."),
    ("global.wrong-command-syntax", "{prefix}Wrong syntax, use: %command%"),
    ("help.header", "TreasureHunt v%version%"),
    ("help.entry", "%usage% - %description%"),
    ("create.title", "Treasure placement"),
    ("create.subtitle", "Click the block that hides the treasure"),
    ("create.info-message", "{prefix}Click a block to place the treasure. You have %seconds% seconds."),
    ("create.success", "{prefix}Treasure %id% placed in %world% at %x%, %y%, %z%."),
    ("create.error", "{prefix}The treasure could not be saved, run the create command again."),
    ("create.timeout", "{prefix}Treasure placement timed out."),
    ("claim.success", "{prefix}You found treasure %id%!"),
    ("claim.already-claimed", "{prefix}You have already claimed this treasure."),
    ("claim.failed", "{prefix}This treasure cannot be claimed right now."),
    ("list.empty", "{prefix}No treasures have been placed yet."),
    ("list.header", "{prefix}Treasures (%count%):"),
    ("list.item", " - %id% in %world% at %pos%: %cmd%"),
    ("delete.deleted", "{prefix}Treasure %id% deleted."),
    ("delete.not-found", "{prefix}No treasure with id %id%."),
    ("delete.error", "{prefix}Treasure %id% could not be deleted."),
    ("completed.empty", "{prefix}Nobody has found %id% yet."),
    ("completed.header", "{prefix}Players who found %id%:"),
    ("completed.item", " - %player%"),
    ("reload.done", "{prefix}Reloaded %count% treasures."),
];

/// Full plugin configuration.
#[derive(Debug, Clone, Default)]
pub struct TreasureHuntConfig {
    pub settings: Settings,
    pub messages: MessagesConfig,
}

impl TreasureHuntConfig {
    /// Reads `dir`, writing defaults for any missing file first.
    pub async fn load(dir: &Path) -> Result<Self, Error> {
        ensure_defaults(dir).await?;

        let settings_text = read_file(dir, ConfigFile::Config).await?;
        let mut settings: Settings = toml::from_str(&settings_text)?;

        let messages_text = read_file(dir, ConfigFile::Messages).await?;
        let mut messages: MessagesConfig = toml::from_str(&messages_text)?;
        messages.fill_missing();

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            info!("{} is set, overriding database.url", DATABASE_URL_ENV);
            settings.database.url = url;
        }

        if settings.database.max_connections == 0 {
            return Err(Error::Config("database.max_connections must be at least 1".into()));
        }

        Ok(Self { settings, messages })
    }
}

async fn read_file(dir: &Path, file: ConfigFile) -> Result<String, Error> {
    let path = dir.join(file.file_name());
    fs::read_to_string(&path)
        .await
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))
}

/// Creates `dir` and writes every [`ConfigFile`] that does not exist yet.
pub async fn ensure_defaults(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).await?;
    for file in ConfigFile::ALL {
        let path = dir.join(file.file_name());
        if fs::try_exists(&path).await? {
            continue;
        }
        fs::write(&path, file.default_contents()?).await?;
        info!("Wrote default {}", path.display());
    }
    Ok(())
}
