// src/lib.rs

pub mod config;
pub mod db;
pub mod repositories;
pub mod cache;
pub mod messages;
pub mod services;
pub mod plugin;
pub mod test_utils;

pub use treasurehunt_common::error::Error;
pub use treasurehunt_common::{models, traits};
pub use plugin::TreasureHunt;
pub use config::TreasureHuntConfig;
