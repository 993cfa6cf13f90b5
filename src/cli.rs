//! Command-line interface for the to-do task API.
//!
//! Global flags override the configuration file; running without a
//! subcommand starts the server.

use clap::{Parser, Subcommand};

/// To-do task REST API server and tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to load instead of the default locations
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// SQLite database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Port for the HTTP server (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Log at debug level instead of info
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve,

    /// Create the database schema and seed demo tasks into an empty table
    Init,
}
