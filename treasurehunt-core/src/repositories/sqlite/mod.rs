// src/repositories/sqlite/mod.rs

pub mod treasures;

pub use treasures::SqliteTreasureRepository;
