// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SecureChat - secure-conversation synchronization core.
//!
//! This is the binary entry point: configuration inspection and offline
//! transcript tooling.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SecureChat - secure-conversation synchronization core.
#[derive(Parser, Debug)]
#[command(name = "securechat", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective configuration as TOML.
    Config,
    /// Validate a configuration file and report every problem found.
    Check {
        /// Configuration file to validate.
        path: PathBuf,
    },
    /// Insert the unread divider into a JSON transcript.
    Divider {
        /// JSON file holding an array of chat messages, oldest first.
        transcript: PathBuf,
        /// Number of unread operator messages.
        #[arg(long, default_value_t = 0)]
        unread: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    // `check` reports its own diagnostics; everything else needs a valid config first.
    if let Some(Commands::Check { path }) = &cli.command {
        std::process::exit(commands::check(path));
    }

    let loaded = match &cli.config {
        Some(path) => securechat_config::load_and_validate_path(path),
        None => securechat_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            securechat_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let result = match cli.command {
        Some(Commands::Config) => commands::print_config(&config),
        Some(Commands::Divider { transcript, unread }) => {
            commands::print_divided_transcript(&transcript, unread)
        }
        Some(Commands::Check { .. }) => Ok(()),
        None => {
            println!("securechat: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("securechat: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("securechat={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
