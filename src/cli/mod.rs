//! CLI module for Delve
//!
//! Provides command-line interface parsing and handling for the delve-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;
pub mod research;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Delve - asynchronous research job server
///
/// Plans web searches for a query, runs them concurrently and synthesizes a
/// report or a top-10 trend list.
#[derive(Parser, Debug)]
#[command(
    name = "delve-server",
    version,
    about = "Delve - asynchronous research job server",
    long_about = "Plans web searches for a query, runs them concurrently and synthesizes\n\
                  either a long-form report or a list of ten trends.\n\n\
                  Run without arguments to start the server, or use 'research' to run one job in-process.",
    after_help = "EXAMPLES:\n    \
                  delve-server                                     # Start the server (reads delve.toml)\n    \
                  delve-server --config my.toml serve              # Use a custom config file\n    \
                  delve-server research \"solid state batteries\"    # Run one report job\n    \
                  delve-server research \"edge AI\" --mode trends -o trends.json"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "delve.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Run one research job in-process and print the result
    Research {
        /// The research question
        query: String,

        /// `report` or `trends`
        #[arg(short, long, default_value = "report")]
        mode: String,

        /// Write the result to this file (markdown for reports, JSON for trends)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Status polling interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
