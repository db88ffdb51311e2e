//! # INGRES - Groundwater Monitoring Backend
//!
//! The main binary for the INGRES groundwater dashboard.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for data and chatbot operations
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      apps/ingres (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐    │
//! │  │   CLI       │    │   HTTP API  │    │  Config (TOML +  │    │
//! │  │  (clap)     │    │   (axum)    │    │  environment)    │    │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘    │
//! │         │                  │                    │               │
//! │         └──────────────────┼────────────────────┘               │
//! │                            ▼                                    │
//! │                    ┌───────────────┐                            │
//! │                    │  ingres-core  │                            │
//! │                    │ (THE LOGIC)   │                            │
//! │                    └───────────────┘                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! ingres server --host 0.0.0.0 --port 4000
//!
//! # CLI operations
//! ingres overview
//! ingres ask "Which wells are high risk?"
//! ingres import -f survey.csv
//! ingres generate --seed 42
//! ```

use clap::Parser;
use ingres::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // INGRES_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("INGRES_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ingres=info,ingres_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the INGRES startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗███╗   ██╗ ██████╗ ██████╗ ███████╗███████╗
  ██║████╗  ██║██╔════╝ ██╔══██╗██╔════╝██╔════╝
  ██║██╔██╗ ██║██║  ███╗██████╔╝█████╗  ███████╗
  ██║██║╚██╗██║██║   ██║██╔══██╗██╔══╝  ╚════██║
  ██║██║ ╚████║╚██████╔╝██║  ██║███████╗███████║
  ╚═╝╚═╝  ╚═══╝ ╚═════╝ ╚═╝  ╚═╝╚══════╝╚══════╝

  Groundwater Monitoring Backend v{}

  Wells • Quality • Recharge
"#,
        env!("CARGO_PKG_VERSION")
    );
}
