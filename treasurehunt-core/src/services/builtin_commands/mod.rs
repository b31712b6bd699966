// File: treasurehunt-core/src/services/builtin_commands/mod.rs
//! One file per `/th` sub-command. `handle_builtin_command` and
//! `complete_builtin_command` dispatch on the closed [`AdminCommand`] set.

pub mod help_command;
pub mod create_command;
pub mod list_command;
pub mod delete_command;
pub mod completed_command;
pub mod reload_command;

use crate::services::command_service::{AdminCommand, CommandContext};
use crate::services::treasure_service::TreasureService;

pub async fn handle_builtin_command(cmd: AdminCommand, ctx: &CommandContext<'_>) {
    match cmd {
        AdminCommand::Help => help_command::handle_help(ctx),
        AdminCommand::Create => create_command::handle_create(ctx),
        AdminCommand::List => list_command::handle_list(ctx),
        AdminCommand::Delete => delete_command::handle_delete(ctx).await,
        AdminCommand::Completed => completed_command::handle_completed(ctx).await,
        AdminCommand::Reload => reload_command::handle_reload(ctx).await,
    }
}

/// Completion for the arguments after the sub-command name.
pub fn complete_builtin_command(
    cmd: AdminCommand,
    treasures: &TreasureService,
    args: &[&str],
) -> Vec<String> {
    match (cmd, args) {
        (AdminCommand::Delete | AdminCommand::Completed, [partial]) => treasures
            .ids()
            .into_iter()
            .filter(|id| id.starts_with(*partial))
            .collect(),
        _ => Vec::new(),
    }
}
