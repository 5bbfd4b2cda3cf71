//! CLI interface for lazypr

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod create;

pub use create::CreateCommand;

/// lazypr: AI-powered PR creation from git diffs
#[derive(Parser)]
#[command(name = "lazypr")]
#[command(about = "AI-powered PR creation from git diffs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories
#[derive(Subcommand)]
pub enum Commands {
    /// Create a PR with an AI-generated title and description
    Create(CreateCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Create(create_cmd) => create_cmd.execute().await,
        }
    }
}
