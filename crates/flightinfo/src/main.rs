//! `flightinfo` - CLI for the flight information service
//!
//! This binary runs the HTTP server and provides offline import, statistics and
//! configuration commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use flightinfo::cli::{Cli, Command, ConfigCommand, ImportCommand, ServeCommand};
use flightinfo::storage::read_flights_json;
use flightinfo::{
    http, init_logging, Config, FlightQueryService, FlightStore, MemoryStore, SqliteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
        Command::Serve(serve_cmd) => handle_serve(load_config(cli.config)?, serve_cmd).await,
        Command::Import(import_cmd) => handle_import(&load_config(cli.config)?, &import_cmd),
        Command::Stats(stats_cmd) => handle_stats(&load_config(cli.config)?, stats_cmd.json).await,
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(addr) = cmd.addr {
        config.server.addr = addr;
    }

    let store: Arc<dyn FlightStore> = match &cmd.fixture {
        Some(path) => {
            let flights = read_flights_json(path)
                .with_context(|| format!("reading fixture {}", path.display()))?;
            info!(
                "Serving {} flights from fixture {}",
                flights.len(),
                path.display()
            );
            Arc::new(MemoryStore::from_new_flights(flights))
        }
        None => Arc::new(open_store(&config)?),
    };

    http::serve(&config.server, FlightQueryService::new(store)).await?;
    Ok(())
}

fn handle_import(config: &Config, cmd: &ImportCommand) -> anyhow::Result<()> {
    let flights = read_flights_json(&cmd.file)
        .with_context(|| format!("reading {}", cmd.file.display()))?;
    let store = open_store(config)?;
    let ids = store.insert_many(&flights)?;

    println!(
        "Imported {} flights into {}",
        ids.len(),
        store.path().display()
    );
    Ok(())
}

async fn handle_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let service = FlightQueryService::new(Arc::new(store));
    let stats = service.get_statistics().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Flight statistics");
        println!("-----------------");
        println!("Flights:           {}", stats.total_flights);
        println!("Airlines:          {}", stats.total_airlines);
        println!("Departure cities:  {}", stats.total_departure_cities);
        println!("Arrival cities:    {}", stats.total_arrival_cities);
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Server]");
                println!("  Address:            {}", config.server.addr);
                println!("  Base path:          {}", config.server.base_path);
                println!(
                    "  Request timeout:    {}s",
                    config.server.request_timeout_secs
                );
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("configuration error in {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let path = config.database_path();
    SqliteStore::open(&path).with_context(|| format!("opening database {}", path.display()))
}
