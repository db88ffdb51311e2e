//! # INGRES CLI Module
//!
//! This module implements the CLI interface for INGRES.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `overview` - Print network statistics (the default)
//! - `ask` - Ask the chatbot a question offline
//! - `import` - Replace the dataset with a CSV file
//! - `export` - Write the dataset as CSV
//! - `generate` - Write a synthetic Tamil Nadu dataset

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use ingres_core::IngresError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// INGRES - Groundwater monitoring backend
///
/// Serves well data, statistics and a multilingual chatbot for the
/// INGRES dashboard.
#[derive(Parser, Debug)]
#[command(name = "ingres")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (also read from INGRES_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the data files (overrides config)
    #[arg(short = 'D', long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show network overview statistics
    Overview,

    /// Ask the chatbot a question
    Ask {
        /// The question
        message: String,

        /// Reply language (en, ta, hi, te); detected when omitted
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Replace the dataset with a CSV file
    Import {
        /// Path to the CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export the dataset as CSV
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a synthetic dataset
    Generate {
        /// Output file (defaults to the primary data file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), IngresError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            cmd_server(config).await
        }
        Some(Commands::Overview) => cmd_overview(&config, json_mode),
        Some(Commands::Ask { message, language }) => {
            cmd_ask(&config, json_mode, &message, language.as_deref())
        }
        Some(Commands::Import { file }) => cmd_import(&config, json_mode, &file),
        Some(Commands::Export { output }) => cmd_export(&config, &output),
        Some(Commands::Generate { output, seed }) => {
            cmd_generate(&config, json_mode, output.as_deref(), seed)
        }
        None => {
            // No subcommand - show the overview by default
            cmd_overview(&config, json_mode)
        }
    }
}
