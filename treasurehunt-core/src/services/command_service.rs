// File: treasurehunt-core/src/services/command_service.rs

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use treasurehunt_common::models::CommandSender;
use treasurehunt_common::traits::{GameHost, MessageResolver};
use crate::services::builtin_commands::{
    complete_builtin_command, handle_builtin_command,
};
use crate::services::placement_service::PlacementCoordinator;
use crate::services::redemption_service::RedemptionEngine;
use crate::services::treasure_service::TreasureService;

/// Label the host registers the admin command under.
pub const COMMAND_LABEL: &str = "th";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminCommand {
    Help,
    Create,
    List,
    Delete,
    Completed,
    Reload,
}

/// Static description of one sub-command.
#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor {
    pub command: AdminCommand,
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    /// Whether the configured admin permission is required.
    pub requires_admin: bool,
    /// Arguments expected after the sub-command name.
    pub min_args: usize,
}

pub const COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        command: AdminCommand::Help,
        name: "help",
        usage: "/th help",
        description: "Shows this list",
        requires_admin: false,
        min_args: 0,
    },
    CommandDescriptor {
        command: AdminCommand::Create,
        name: "create",
        usage: "/th create <id> <command...>",
        description: "Hides a new treasure at the next block you click",
        requires_admin: true,
        min_args: 2,
    },
    CommandDescriptor {
        command: AdminCommand::List,
        name: "list",
        usage: "/th list",
        description: "Lists every placed treasure",
        requires_admin: true,
        min_args: 0,
    },
    CommandDescriptor {
        command: AdminCommand::Delete,
        name: "delete",
        usage: "/th delete <id>",
        description: "Deletes a treasure and everyone's claims of it",
        requires_admin: true,
        min_args: 1,
    },
    CommandDescriptor {
        command: AdminCommand::Completed,
        name: "completed",
        usage: "/th completed <id>",
        description: "Lists the players who found a treasure",
        requires_admin: true,
        min_args: 1,
    },
    CommandDescriptor {
        command: AdminCommand::Reload,
        name: "reload",
        usage: "/th reload",
        description: "Reloads treasures from the database",
        requires_admin: true,
        min_args: 0,
    },
];

impl AdminCommand {
    pub fn descriptor(self) -> &'static CommandDescriptor {
        COMMANDS
            .iter()
            .find(|d| d.command == self)
            .unwrap_or(&COMMANDS[0])
    }

    pub fn from_name(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|d| d.command)
    }
}

/// What happened to one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Ran(AdminCommand),
    NoConsole,
    NoPermission,
    WrongSyntax,
}

/// Context passed to built-in command handlers.
pub struct CommandContext<'a> {
    pub sender: &'a CommandSender,
    /// Arguments after the sub-command name.
    pub args: &'a [&'a str],
    pub placement: &'a Arc<PlacementCoordinator>,
    pub redemption: &'a RedemptionEngine,
    pub treasures: &'a TreasureService,
    pub host: &'a dyn GameHost,
    pub messages: &'a dyn MessageResolver,
    pub creation_timeout: Duration,
    pub admin_permission: &'a str,
}

impl CommandContext<'_> {
    pub fn reply(&self, text: &str) {
        match self.sender {
            CommandSender::Player(player) => self.host.send_message(player, text),
            CommandSender::Console => self.host.send_console_message(text),
        }
    }

    pub fn reply_key(&self, key: &str, placeholders: &[(&str, &str)]) {
        self.reply(&self.messages.resolve(key, placeholders));
    }

    pub fn may_use(&self, descriptor: &CommandDescriptor) -> bool {
        may_use(self.host, self.sender, descriptor, self.admin_permission)
    }
}

fn may_use(
    host: &dyn GameHost,
    sender: &CommandSender,
    descriptor: &CommandDescriptor,
    admin_permission: &str,
) -> bool {
    if !descriptor.requires_admin {
        return true;
    }
    match sender {
        CommandSender::Player(player) => host.has_capability(player, admin_permission),
        CommandSender::Console => false,
    }
}

/// Entry point for `/th ...`.
pub struct CommandService {
    placement: Arc<PlacementCoordinator>,
    redemption: Arc<RedemptionEngine>,
    treasures: Arc<TreasureService>,
    host: Arc<dyn GameHost>,
    messages: Arc<dyn MessageResolver>,
    creation_timeout: Duration,
    admin_permission: String,
}

impl CommandService {
    pub fn new(
        placement: Arc<PlacementCoordinator>,
        redemption: Arc<RedemptionEngine>,
        treasures: Arc<TreasureService>,
        host: Arc<dyn GameHost>,
        messages: Arc<dyn MessageResolver>,
        creation_timeout: Duration,
        admin_permission: impl Into<String>,
    ) -> Self {
        Self {
            placement,
            redemption,
            treasures,
            host,
            messages,
            creation_timeout,
            admin_permission: admin_permission.into(),
        }
    }

    /// Runs `args` (everything after the command label) for `sender`.
    ///
    /// Misuse never reaches the store: it is answered here with a message.
    pub async fn execute(&self, sender: &CommandSender, args: &[&str]) -> CommandStatus {
        let (descriptor, rest) = match args.split_first() {
            Some((name, rest)) => match AdminCommand::from_name(name) {
                Some(cmd) => (cmd.descriptor(), rest),
                None => (AdminCommand::Help.descriptor(), &[][..]),
            },
            None => (AdminCommand::Help.descriptor(), &[][..]),
        };

        let ctx = CommandContext {
            sender,
            args: rest,
            placement: &self.placement,
            redemption: &self.redemption,
            treasures: &self.treasures,
            host: self.host.as_ref(),
            messages: self.messages.as_ref(),
            creation_timeout: self.creation_timeout,
            admin_permission: &self.admin_permission,
        };

        if descriptor.requires_admin && matches!(sender, CommandSender::Console) {
            ctx.reply_key("global.no-console", &[]);
            return CommandStatus::NoConsole;
        }
        if !ctx.may_use(descriptor) {
            ctx.reply_key("global.insufficient-permission", &[]);
            return CommandStatus::NoPermission;
        }
        if rest.len() < descriptor.min_args {
            ctx.reply_key("global.wrong-command-syntax", &[("command", descriptor.usage)]);
            return CommandStatus::WrongSyntax;
        }

        debug!(sender = ?sender, "Running /{} {}", COMMAND_LABEL, descriptor.name);
        handle_builtin_command(descriptor.command, &ctx).await;
        info!(sender = ?sender, "Ran /{} {}", COMMAND_LABEL, descriptor.name);
        CommandStatus::Ran(descriptor.command)
    }

    /// Tab completion for `args`; the last element is the word being typed.
    pub fn complete(&self, sender: &CommandSender, args: &[&str]) -> Vec<String> {
        match args {
            [] => self.usable_names(sender, ""),
            [partial] => self.usable_names(sender, partial),
            [name, rest @ ..] => {
                let Some(cmd) = AdminCommand::from_name(name) else {
                    return Vec::new();
                };
                if !may_use(self.host.as_ref(), sender, cmd.descriptor(), &self.admin_permission) {
                    return Vec::new();
                }
                complete_builtin_command(cmd, &self.treasures, rest)
            }
        }
    }

    fn usable_names(&self, sender: &CommandSender, partial: &str) -> Vec<String> {
        let partial = partial.to_lowercase();
        COMMANDS
            .iter()
            .filter(|d| may_use(self.host.as_ref(), sender, d, &self.admin_permission))
            .filter(|d| d.name.starts_with(&partial))
            .map(|d| d.name.to_string())
            .collect()
    }
}
