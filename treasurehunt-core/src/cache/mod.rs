pub mod treasure_cache;

pub use treasure_cache::{TreasureCache, TreasureSnapshot};
