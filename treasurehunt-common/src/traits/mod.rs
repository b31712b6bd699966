pub mod repository_traits;
pub mod host_traits;

pub use repository_traits::TreasureRepository;
pub use host_traits::{GameHost, MessageResolver};
