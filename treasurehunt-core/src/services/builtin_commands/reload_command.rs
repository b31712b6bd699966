use crate::services::command_service::CommandContext;

pub async fn handle_reload(ctx: &CommandContext<'_>) {
    // a failed refresh keeps the old cache, so report what is loaded either way
    let count = match ctx.treasures.reload().await {
        Some(count) => count,
        None => ctx.treasures.ids().len(),
    };
    let count = count.to_string();
    ctx.reply_key("reload.done", &[("count", count.as_str())]);
}
