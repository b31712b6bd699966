use tracing::warn;
use treasurehunt_common::models::CommandSender;
use crate::services::command_service::CommandContext;

/// `/th create <id> <command...>`: everything after the id is the command template.
pub fn handle_create(ctx: &CommandContext<'_>) {
    let CommandSender::Player(player) = ctx.sender else {
        warn!("create reached without a player sender");
        ctx.reply_key("global.no-console", &[]);
        return;
    };
    let treasure_id = ctx.args[0];
    let command = ctx.args[1..].join(" ");

    // the expiry task runs on its own; nothing to wait for here
    let _expiry = ctx
        .placement
        .begin_placement(player, treasure_id, &command, ctx.creation_timeout);
}
