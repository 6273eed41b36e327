// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flowdesk - AI agent backend for service businesses.
//!
//! This is the binary entry point for the Flowdesk server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use clap::{Parser, Subcommand};

/// Flowdesk - AI agent backend for service businesses.
#[derive(Parser, Debug)]
#[command(name = "flowdesk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Flowdesk server.
    Serve,
    /// Print the resolved configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match flowdesk_config::load_and_validate() {
        Ok(config) => {
            eprintln!(
                "flowdesk: config loaded (server={}:{})",
                config.server.host, config.server.port
            );
            config
        }
        Err(errors) => {
            flowdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("flowdesk serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("flowdesk config: cannot render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("flowdesk: use --help for available commands");
        }
    }
}
