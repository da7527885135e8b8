use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use manu_application::ChatService;
use manu_core::config::ChatConfig;
use manu_infrastructure::ConfigService;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "manu")]
#[command(about = "Manu - the SocialManu assistant chat in your terminal", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log everything at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive assistant chat (default)
    Chat {
        /// Simulated typing time in milliseconds, overriding the config
        #[arg(long)]
        typing_delay: Option<u64>,
    },
    /// Ask a single question and print the reply
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print the active topic table
    Topics,
}

fn load_config(path: Option<PathBuf>) -> Result<ChatConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new().context("Failed to resolve config path")?,
    };
    let config = service
        .load()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = load_config(cli.config)?;

    match cli.command.unwrap_or(Commands::Chat { typing_delay: None }) {
        Commands::Chat { typing_delay } => {
            if let Some(ms) = typing_delay {
                config.assistant.typing_delay_ms = ms;
            }
            let service = ChatService::from_config(&config)?;
            commands::chat::run(&service).await?;
        }
        Commands::Ask { text } => {
            let service = ChatService::from_config(&config)?;
            commands::ask::run(&service, &text.join(" ")).await?;
        }
        Commands::Topics => {
            let service = ChatService::from_config(&config)?;
            commands::topics::print(service.topics());
        }
    }

    Ok(())
}
