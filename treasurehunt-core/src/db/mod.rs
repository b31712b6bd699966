// treasurehunt-core/src/db/mod.rs

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;
use treasurehunt_common::traits::TreasureRepository;
use crate::config::DatabaseConfig;
use crate::repositories::{PostgresTreasureRepository, SqliteTreasureRepository};
use crate::Error;

/// Which relational backend a database url points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self, Error> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            Err(Error::Config(format!("unsupported database url '{}'", url)))
        }
    }
}

/// Builds a lazily-connecting pool for `config` and wraps it in the matching repository.
///
/// No connection is opened here, so an unreachable server only shows up on
/// first use (usually `ensure_schema`), where it is logged instead of aborting startup.
pub fn connect(config: &DatabaseConfig) -> Result<Arc<dyn TreasureRepository>, Error> {
    let acquire_timeout = Duration::from_secs(config.acquire_timeout_secs);

    match Backend::from_url(&config.url)? {
        Backend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(acquire_timeout)
                .connect_lazy(&config.url)?;
            info!("Postgres pool configured (max_connections={})", config.max_connections);
            Ok(Arc::new(PostgresTreasureRepository::new(pool)))
        }
        Backend::Sqlite => {
            let options = SqliteConnectOptions::from_str(&config.url)?
                .create_if_missing(true)
                .foreign_keys(true);

            // Every connection to `:memory:` is its own database, so keep exactly one alive.
            let in_memory = config.url.contains(":memory:");
            let mut pool_options = SqlitePoolOptions::new().acquire_timeout(acquire_timeout);
            pool_options = if in_memory {
                pool_options
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                pool_options.max_connections(config.max_connections)
            };

            let pool = pool_options.connect_lazy_with(options);
            info!("SQLite pool configured (in_memory={})", in_memory);
            Ok(Arc::new(SqliteTreasureRepository::new(pool)))
        }
    }
}
