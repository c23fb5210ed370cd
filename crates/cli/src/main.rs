//! Forneria CLI - manual exercise of the ordering assistant.
//!
//! # Usage
//!
//! ```bash
//! # Chat with the assistant from the terminal
//! forneria chat
//!
//! # Reuse a device token so the stored profile carries over
//! forneria chat --device my-test-device
//!
//! # Inspect the configuration resolved from the environment
//! forneria config-check
//! ```
//!
//! # Commands
//!
//! - `chat` - Interactive chat session against the real collaborators
//! - `config-check` - Print the configuration resolved from the environment

#![cfg_attr(not(test), forbid(unsafe_code))]
// Talking on stdout is what this binary is for.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "forneria")]
#[command(author, version, about = "Forneria assistant CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant from the terminal
    Chat {
        /// Device token to reuse a stored customer profile
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Print the configuration resolved from the environment
    ConfigCheck,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Chat { device } => commands::chat::run(device).await?,
        Commands::ConfigCheck => commands::config_check::run()?,
    }
    Ok(())
}
