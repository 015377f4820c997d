//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Tabula - delete your own messages and reactions across Discord
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(about = "Delete your own messages and reactions across Discord", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Personal data export (root directory or messages/index.json)
    #[arg(short = 'd', long)]
    pub data_package: Option<PathBuf>,

    /// User token; prompted for when absent
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file replacing the user configuration layers
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
