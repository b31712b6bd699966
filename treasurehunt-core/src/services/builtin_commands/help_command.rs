use crate::services::command_service::{CommandContext, COMMANDS};

pub fn handle_help(ctx: &CommandContext<'_>) {
    ctx.reply_key("help.header", &[("version", env!("CARGO_PKG_VERSION"))]);
    for descriptor in COMMANDS.iter().filter(|d| ctx.may_use(d)) {
        ctx.reply_key(
            "help.entry",
            &[("usage", descriptor.usage), ("description", descriptor.description)],
        );
    }
}
