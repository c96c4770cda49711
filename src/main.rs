//! Greeting Card CLI
//!
//! Command-line interface for running greeting cards headlessly.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use greeting_card::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Greeting Card v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Greeting Card v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Simulate {
            card,
            seconds,
            open_at_ms,
            no_click,
            escape_at_ms,
            json,
        } => commands::simulate(&card, seconds, open_at_ms, no_click, escape_at_ms, json)
            .context("simulation failed"),
        Commands::Config => {
            commands::print_default_config().context("could not print configuration")
        }
        #[cfg(feature = "realtime")]
        Commands::Live { card, seconds } => {
            commands::live(&card, seconds).context("live run failed")
        }
    }
}
