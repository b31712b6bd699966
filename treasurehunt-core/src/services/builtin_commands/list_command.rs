use crate::services::command_service::CommandContext;

pub fn handle_list(ctx: &CommandContext<'_>) {
    let snapshot = ctx.treasures.list();
    if snapshot.is_empty() {
        ctx.reply_key("list.empty", &[]);
        return;
    }

    let count = snapshot.len().to_string();
    ctx.reply_key("list.header", &[("count", count.as_str())]);

    let mut treasures: Vec<_> = snapshot.values().collect();
    treasures.sort_by(|a, b| a.treasure_id.cmp(&b.treasure_id));
    for t in treasures {
        let loc = &t.location;
        let pos = format!("{}, {}, {}", loc.x, loc.y, loc.z);
        ctx.reply_key(
            "list.item",
            &[
                ("id", t.treasure_id.as_str()),
                ("world", loc.world.as_str()),
                ("pos", pos.as_str()),
                ("cmd", t.command.as_str()),
            ],
        );
    }
}
