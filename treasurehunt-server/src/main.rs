use std::io::{stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use treasurehunt_core::models::{BlockLocation, CommandSender, InteractionHand, WorldInteraction};
use treasurehunt_core::services::command_service::COMMAND_LABEL;
use treasurehunt_core::{TreasureHunt, TreasureHuntConfig};

mod console_host;
use console_host::ConsoleHost;

#[derive(Parser, Debug, Clone)]
#[command(name = "treasurehunt")]
#[command(author, version, about = "TreasureHunt - hide treasures, let players claim them once")]
struct Args {
    /// Directory holding config.toml and messages.toml
    #[arg(long, default_value = "treasurehunt")]
    config_dir: PathBuf,

    /// Overrides database.url from config.toml
    #[arg(long)]
    database_url: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("treasurehunt=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let mut config = TreasureHuntConfig::load(&args.config_dir).await?;
    if let Some(url) = args.database_url {
        config.settings.database.url = url;
    }
    info!("TreasureHunt console starting, config_dir={}", args.config_dir.display());

    let (console_tx, mut console_rx) = mpsc::unbounded_channel::<String>();
    let host = Arc::new(ConsoleHost::new(console_tx));
    let plugin = TreasureHunt::start(&config, host.clone()).await?;

    println!("Type 'help' for commands.");
    let mut reader = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        stdout().flush()?;

        tokio::select! {
            line = reader.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(line.trim(), &plugin, &host).await {
                    break;
                }
            }
            Some(command) = console_rx.recv() => {
                println!();
                println!("[console] executing: {}", command);
            }
        }
    }

    plugin.shutdown().await;
    println!("Goodbye!");
    Ok(())
}

/// Returns `false` once the user asked to quit.
async fn handle_line(line: &str, plugin: &TreasureHunt, host: &ConsoleHost) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] => {}
        ["quit"] | ["exit"] => return false,
        ["help"] => print_help(),
        ["as", name, label, args @ ..] if *label == COMMAND_LABEL => {
            let player = host.player(name);
            host.grant_admin(&player);
            let status = plugin.commands.execute(&CommandSender::Player(player), args).await;
            info!("/{} as {} => {:?}", COMMAND_LABEL, name, status);
        }
        ["console", label, args @ ..] if *label == COMMAND_LABEL => {
            let status = plugin.commands.execute(&CommandSender::Console, args).await;
            info!("/{} as console => {:?}", COMMAND_LABEL, status);
        }
        ["complete", name, label, args @ ..] if *label == COMMAND_LABEL => {
            let player = host.player(name);
            let sender = CommandSender::Player(player);
            println!("{}", plugin.commands.complete(&sender, args).join(" "));
        }
        ["click", name, world, x, y, z, rest @ ..] => {
            let (Ok(x), Ok(y), Ok(z)) = (x.parse::<i32>(), y.parse::<i32>(), z.parse::<i32>()) else {
                println!("Coordinates must be integers.");
                return true;
            };
            let hand = match rest {
                ["off"] => InteractionHand::Off,
                _ => InteractionHand::Main,
            };
            let player = host.player(name);
            let mut event = WorldInteraction::new(player, BlockLocation::new(*world, x, y, z), hand);
            match plugin.interactions.handle(&mut event) {
                Some(task) => match task.await {
                    Ok(outcome) => info!("click => {:?}", outcome),
                    Err(e) => error!("Interaction task failed: {}", e),
                },
                None => println!("Nothing happens."),
            }
        }
        _ => println!("Unknown input, type 'help'."),
    }
    true
}

fn print_help() {
    println!("Commands:");
    println!("  as <player> th <args...>             - run /th as an admin player");
    println!("  console th <args...>                 - run /th as the console");
    println!("  complete <player> th <args...>       - tab completion for /th");
    println!("  click <player> <world> <x> <y> <z> [off] - click a block");
    println!("  quit                                 - exit");
}
