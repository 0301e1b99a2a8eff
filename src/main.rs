mod activity;
mod api;
mod cli;
mod config;
mod db;
mod error;
mod pipeline;
mod query;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::config::Config;
use crate::db::Database;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            file,
            replace,
            wrap_overnight,
        } => handle_ingest(file, replace, wrap_overnight),
        Commands::Serve { port } => handle_serve(port).await,
        Commands::Status => handle_status(),
        Commands::Config { command } => handle_config_command(command),
    }
}

fn handle_ingest(file: Option<PathBuf>, replace: bool, wrap_overnight: bool) -> Result<()> {
    let mut config = load_or_default_config()?;
    if wrap_overnight {
        config.wrap_overnight = true;
    }

    let csv_path = file.unwrap_or_else(|| config.csv_path.clone());
    let summary = pipeline::run_ingest(&config, &csv_path, replace)?;

    println!(
        "Processed {} day(s) from {} row(s)",
        summary.days, summary.rows
    );
    println!("- store: {}", config.db_path.display());

    Ok(())
}

async fn handle_serve(port: Option<u16>) -> Result<()> {
    let mut config = load_or_default_config()?;
    if let Some(port) = port {
        config.api_port = port;
    }

    let shared_config = Arc::new(config);

    tokio::select! {
        api_result = api::run_server(Arc::clone(&shared_config)) => {
            api_result?;
        }
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

fn handle_status() -> Result<()> {
    let config = load_or_default_config()?;
    let database = Database::open(&config.db_path)?;

    println!("daytrack status");
    println!("- db_path: {}", config.db_path.display());
    println!("- csv_path: {}", config.csv_path.display());
    println!("- stored_days: {}", database.day_count()?);
    println!(
        "- latest_date: {}",
        database
            .latest_date()?
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(())
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = load_or_default_config()?;
            config.set_value(&key, &value)?;
            config.ensure_bootstrap_files()?;
            config.save()?;

            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = load_or_default_config()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}

fn load_or_default_config() -> Result<Config> {
    Config::load().or_else(|_| {
        let config = Config::default();
        config.ensure_bootstrap_files()?;
        config.save()?;
        Ok(config)
    })
}
