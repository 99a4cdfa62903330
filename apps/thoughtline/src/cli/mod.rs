//! # Thoughtline CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP/WebSocket server (default)
//! - `replay` - Ingest a recorded session offline and report the resulting graph
//! - `validate` - Check a recorded session without building a graph

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thoughtline::config::Config;
use thoughtline_core::LineageError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Thoughtline - Reasoning Lineage Server
///
/// Turns a stream of sequential-thinking steps into a branch/revision graph
/// and streams it to connected observers.
#[derive(Parser, Debug)]
#[command(name = "thoughtline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a thoughtline.toml config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP/WebSocket server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ingest a JSON array of records offline and report the outcome
    Replay {
        /// Path to the records file
        #[arg(short, long)]
        file: PathBuf,

        /// Print the final graph as an init-shaped JSON object
        #[arg(long)]
        json: bool,
    },

    /// Validate a JSON array of records
    Validate {
        /// Path to the records file
        #[arg(short, long)]
        file: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LineageError> {
    match cli.command {
        Some(Commands::Server { host, port }) => {
            let config = Config::load(cli.config.as_deref())?.with_server_overrides(host, port);
            cmd_server(config).await
        }
        Some(Commands::Replay { file, json }) => cmd_replay(&file, json),
        Some(Commands::Validate { file }) => cmd_validate(&file),
        None => cmd_server(Config::load(cli.config.as_deref())?).await,
    }
}
