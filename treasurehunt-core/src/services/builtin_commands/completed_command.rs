use crate::services::command_service::CommandContext;

/// `/th completed <id>`: who has found the treasure so far.
pub async fn handle_completed(ctx: &CommandContext<'_>) {
    let treasure_id = ctx.args[0];
    let redeemers = ctx.redemption.list_redeemers(treasure_id).await;
    if redeemers.is_empty() {
        ctx.reply_key("completed.empty", &[("id", treasure_id)]);
        return;
    }

    ctx.reply_key("completed.header", &[("id", treasure_id)]);
    for name in &redeemers {
        ctx.reply_key("completed.item", &[("player", name.as_str())]);
    }
}
