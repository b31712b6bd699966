// File: treasurehunt-core/src/services/mod.rs

pub mod placement_service;
pub mod redemption_service;
pub mod treasure_service;
pub mod interaction_service;
pub mod command_service;
pub mod builtin_commands;

pub use placement_service::PlacementCoordinator;
pub use redemption_service::RedemptionEngine;
pub use treasure_service::TreasureService;
pub use interaction_service::{InteractionOutcome, InteractionService};
pub use command_service::{AdminCommand, CommandService, CommandStatus};
