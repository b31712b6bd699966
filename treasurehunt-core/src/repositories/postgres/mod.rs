// src/repositories/postgres/mod.rs

pub mod treasures;

pub use treasures::PostgresTreasureRepository;
