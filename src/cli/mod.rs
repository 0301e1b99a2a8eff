use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "daytrack",
    about = "Personal activity daily stats pipeline & dashboard API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ingest an activity CSV into the daily stats store
    Ingest {
        /// CSV file to ingest; defaults to the configured csv_path
        #[arg(long)]
        file: Option<PathBuf>,
        /// Rebuild both collections from scratch instead of upserting
        #[arg(long, default_value_t = false)]
        replace: bool,
        /// Treat end-before-start intervals as crossing midnight
        #[arg(long, default_value_t = false)]
        wrap_overnight: bool,
    },
    /// Serve the dashboard API until interrupted
    Serve {
        /// Port to bind; defaults to the configured api_port
        #[arg(long)]
        port: Option<u16>,
    },
    Status,
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}
