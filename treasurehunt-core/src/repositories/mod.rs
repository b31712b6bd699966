// src/repositories/mod.rs

pub mod postgres;
pub mod sqlite;
pub mod treasure_store;

pub use postgres::treasures::PostgresTreasureRepository;
pub use sqlite::treasures::SqliteTreasureRepository;
pub use treasure_store::TreasureStore;

/// True when the driver rejected a write because of a UNIQUE / primary key constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
