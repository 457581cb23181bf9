//! CLI command definitions and dispatch.

pub mod browse;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use foldertree_core::config::AppConfig;
use foldertree_core::error::AppError;

/// Foldertree — browse a folder hierarchy one page at a time
#[derive(Debug, Parser)]
#[command(name = "foldertree", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load the folder tree and print the flattened rows
    Browse(browse::BrowseArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Browse(args) => browse::execute(args, config, self.format).await,
        }
    }
}
