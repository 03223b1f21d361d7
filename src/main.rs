//! Campus Hours API Server
//!
//! Run with: cargo run -- --config config.toml
//!
//! # Configuration
//!
//! Settings come from a TOML file (`--config`, or `./config.toml`, the user
//! config directory, `/etc/campus-hours/config.toml`) with environment
//! overrides:
//! - `DATABASE_URL`: SQLite database (default: sqlite://campus_hours.db)
//! - `CAMPUS_HOURS_HOST`: Host to bind to (default: 0.0.0.0)
//! - `CAMPUS_HOURS_PORT`: Port to listen on (default: 8080)
//! - `CAMPUS_HOURS_POOL_SIZE`: Pooled connections (default: 4)
//! - `CAMPUS_HOURS_QUERIES`: Query file (default: queries/queries.sql)
//! - `CAMPUS_HOURS_LOG_LEVEL` / `CAMPUS_HOURS_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Log filter, takes precedence over the configured level

use anyhow::Context;
use campus_hours::api::{serve, AppState};
use campus_hours::config::{generate_default_config, Config, LoggingConfig};
use campus_hours::db::{self, SqlitePool};
use campus_hours::queries::QueryStore;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "campus-hours")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read-only API for professor hours and room schedules")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,

    /// Do not insert baseline data into an empty database
    #[arg(long)]
    skip_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Campus Hours API server v{}", env!("CARGO_PKG_VERSION"));

    // Connect
    let pool = SqlitePool::open(&config.database.url, config.database.pool_size)
        .context("connecting to database")?;
    tracing::info!(
        url = %config.database.url,
        connections = pool.size(),
        "Database connection established"
    );

    // Bootstrap schema and baseline rows before accepting traffic
    db::migrate(&pool).await.context("running migrations")?;

    if config.database.seed && !cli.skip_seed {
        db::seed(&pool).await.context("seeding database")?;
    }

    let queries = QueryStore::new(&config.queries.path);
    if !queries.path().exists() {
        tracing::warn!(
            "Query file {:?} not found; report endpoints will fail until it exists",
            queries.path()
        );
    }

    let state = AppState::new(Arc::new(pool), queries);

    tracing::info!("Starting server on {}", config.server.addr());
    serve(state, &config.server)
        .await
        .context("running HTTP server")?;

    tracing::info!("Campus Hours API server stopped");
    Ok(())
}

/// Install the global tracing subscriber
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("campus_hours={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
