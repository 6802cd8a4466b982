//! Command-line interface definitions and parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "swarmchat", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data directory for the profile database
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Username to claim as the local identity (skips anonymous mode)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Keep the profile in memory only; nothing is persisted
    #[arg(long)]
    pub ephemeral: bool,

    /// Additional channels to join at startup (repeatable)
    #[arg(long = "join", value_name = "CHANNEL")]
    pub channels: Vec<String>,
}
