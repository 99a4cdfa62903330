//! # Thoughtline - Reasoning Lineage Server
//!
//! The main binary for the Thoughtline thought-lineage graph.
//!
//! This application provides:
//! - HTTP ingestion endpoint for sequential-thinking records
//! - WebSocket observer channel (snapshot + deltas)
//! - Offline replay and validation of recorded sessions
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  apps/thoughtline (THE BINARY)               │
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐   │
//! │  │   CLI       │    │   HTTP API  │    │   WebSocket     │   │
//! │  │  (clap)     │    │   (axum)    │    │   observers     │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬────────┘   │
//! │         │                  │                    │            │
//! │         └──────────────────┼────────────────────┘            │
//! │                            ▼                                 │
//! │                  ┌──────────────────┐                        │
//! │                  │ thoughtline-core │                        │
//! │                  │   (THE LOGIC)    │                        │
//! │                  └──────────────────┘                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server
//! thoughtline server --host 0.0.0.0 --port 8080
//!
//! # Offline tools
//! thoughtline replay -f session.json --json
//! thoughtline validate -f session.json
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // THOUGHTLINE_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("THOUGHTLINE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "thoughtline=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    eprintln!(
        r#"
  ┌┬┐┬ ┬┌─┐┬ ┬┌─┐┬ ┬┌┬┐┬  ┬┌┐┌┌─┐
   │ ├─┤│ ││ ││ ┬├─┤ │ │  ││││├┤
   ┴ ┴ ┴└─┘└─┘└─┘┴ ┴ ┴ ┴─┘┴┘└┘└─┘

  Reasoning Lineage Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
