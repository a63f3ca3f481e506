// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenClaw - chat message relay and streaming gateway.
//!
//! Binary entry point: loads configuration, then dispatches to the
//! requested subcommand.

use clap::{Parser, Subcommand};

mod files;
mod serve;

/// OpenClaw - chat message relay and streaming gateway.
#[derive(Parser, Debug)]
#[command(name = "openclaw", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay gateway server.
    Serve,
    /// Load and validate configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match openclaw_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            eprint!("{}", openclaw_config::render_errors(&errors));
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(err) = serve::run_serve(config).await {
                eprintln!("openclaw serve: {err}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!(
                "openclaw: config ok (server {}:{}, database {})",
                config.server.host, config.server.port, config.storage.database_path
            );
        }
        None => {
            println!("openclaw: use --help for available commands");
        }
    }
}
