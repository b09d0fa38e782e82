mod config;
mod logging;
mod server;
mod signals;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use cpt_engine::CptEngine;
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, Database};

use crate::config::{AppConfig, CliOverrides};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// CPT Server - runtime-defined custom post types over REST
#[derive(Parser)]
#[command(name = "cpt-server")]
#[command(about = "CPT Server - runtime-defined custom post types over REST")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use mock database (sqlite::memory:)
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (CPT__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    });

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init_logging(&config.logging);
    tracing::info!("CPT Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!(dsn = %config.database.redacted_dsn(), "Connecting to database");
    // Every pooled connection to `sqlite::memory:` opens its own empty database.
    let max_connections = if config.database.dsn.contains(":memory:") {
        1
    } else {
        config.database.max_connections
    };
    let mut options = ConnectOptions::new(config.database.dsn.clone());
    options
        .max_connections(max_connections)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;

    let engine = CptEngine::init(&db, config.cpt.clone()).await?;
    let router = server::apply_middleware(engine.router(), &config.server);

    server::serve(router, &config.listen_addr()).await?;

    db.close().await?;
    tracing::info!("CPT Server stopped");
    Ok(())
}
