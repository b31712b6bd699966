use treasurehunt_common::models::DeleteOutcome;
use crate::services::command_service::CommandContext;

pub async fn handle_delete(ctx: &CommandContext<'_>) {
    let treasure_id = ctx.args[0];
    let key = match ctx.treasures.delete_treasure(treasure_id).await {
        DeleteOutcome::Deleted { .. } => "delete.deleted",
        DeleteOutcome::NotFound => "delete.not-found",
        DeleteOutcome::Failed => "delete.error",
    };
    ctx.reply_key(key, &[("id", treasure_id)]);
}
