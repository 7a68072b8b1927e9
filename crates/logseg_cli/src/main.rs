//! logseg CLI
//!
//! Command-line simulator for the logseg segment store.
//!
//! # Commands
//!
//! - `run` - Drive a generated workload through one store
//! - `compare` - Run every distribution against a fresh store
//! - `replay` - Process a fixed list of `offset:size` requests

mod commands;
mod report;

use clap::{Parser, Subcommand};
use logseg_core::{StoreConfig, DEFAULT_GC_THRESHOLD};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// logseg segment store simulator.
#[derive(Parser)]
#[command(name = "logseg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of segments in the pool
    #[arg(global = true, long, default_value_t = 1024)]
    segments: usize,

    /// Capacity of each segment in bytes
    #[arg(global = true, long, default_value_t = 1024)]
    capacity: usize,

    /// Fraction of non-empty segments that triggers garbage collection
    #[arg(global = true, long, default_value_t = DEFAULT_GC_THRESHOLD)]
    threshold: f64,

    /// Fail writes immediately when the pool is full instead of collecting
    #[arg(global = true, long)]
    no_forced_gc: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        StoreConfig::new()
            .segment_count(self.segments)
            .segment_capacity(self.capacity)
            .gc_threshold(self.threshold)
            .forced_collection(!self.no_forced_gc)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a generated workload through one store
    Run {
        /// Request distribution (uniform, hotspot, sequential)
        #[arg(short, long, default_value = "uniform")]
        distribution: String,

        /// Number of requests to generate
        #[arg(short, long, default_value_t = 2000)]
        requests: u64,

        /// Uniform requests to add after the first phase
        #[arg(short, long, default_value_t = 0)]
        extra_requests: u64,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Do not collect when the occupancy threshold is reached
        #[arg(long)]
        no_auto_gc: bool,

        /// Show per-segment details
        #[arg(long)]
        details: bool,

        /// Print each collection and dropped request
        #[arg(long)]
        events: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Run every distribution against a fresh store
    Compare {
        /// Number of requests per distribution
        #[arg(short, long, default_value_t = 100)]
        requests: u64,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Collect when the occupancy threshold is reached
        #[arg(long)]
        auto_gc: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Process a fixed list of requests
    Replay {
        /// Request as OFFSET:SIZE; repeatable. Defaults to a built-in script
        #[arg(short = 'q', long = "request")]
        requests: Vec<String>,

        /// Show per-segment details
        #[arg(long)]
        details: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.store_config();

    match cli.command {
        Commands::Run {
            distribution,
            requests,
            extra_requests,
            seed,
            no_auto_gc,
            details,
            events,
            format,
            report,
        } => {
            let options = commands::run::RunOptions {
                distribution: distribution.parse()?,
                requests,
                extra_requests,
                seed,
                auto_collect: !no_auto_gc,
                details,
                events,
            };
            commands::run::run(config, &options, &format, report.as_deref())?;
        }
        Commands::Compare {
            requests,
            seed,
            auto_gc,
            format,
            report,
        } => {
            commands::compare::run(config, requests, seed, auto_gc, &format, report.as_deref())?;
        }
        Commands::Replay {
            requests,
            details,
            format,
            report,
        } => {
            commands::replay::run(config, &requests, details, &format, report.as_deref())?;
        }
        Commands::Version => {
            println!("logseg CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("logseg Core v{}", logseg_core::VERSION);
        }
    }

    Ok(())
}
