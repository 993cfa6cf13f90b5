//! To-Do Task API Server
//!
//! A small HTTP service for managing to-do tasks, backed by SQLite.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Arc;
use todo_api::api;
use todo_api::cli::{Cli, Command};
use todo_api::config::Config;
use todo_api::db::Database;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new().create(true).append(true).open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    // Load configuration, then apply CLI overrides
    let mut config = match &cli.config {
        Some(config_path) => Config::load(config_path)?,
        None => Config::load_or_default(),
    };

    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Command::Init) => run_init(&config),
        Some(Command::Serve) | None => run_server(config).await,
    }
}

/// Create the database schema and seed demo rows if the table is empty.
fn run_init(config: &Config) -> Result<()> {
    config.ensure_db_dir()?;

    let db = Database::open(&config.server.db_path)?;

    let seeded = db.seed_demo_tasks()?;
    if seeded > 0 {
        info!("Seeded {} demo tasks", seeded);
    } else {
        info!("Tasks table already has data, seeding skipped");
    }

    let count = db.count_tasks()?;
    println!(
        "Database ready at {} ({} tasks)",
        config.server.db_path.display(),
        count
    );

    Ok(())
}

/// Run the HTTP server until interrupted.
async fn run_server(config: Config) -> Result<()> {
    config.ensure_db_dir()?;

    info!("Starting To-Do API Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {:?}", config.server.db_path);

    let db = Database::open(&config.server.db_path)?;
    let db = Arc::new(db);

    info!("Database initialized successfully");

    api::start_server(db, &config.server).await
}
