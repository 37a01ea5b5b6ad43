//! CLI interface for cuebridge

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bridge live sensor readings to show-control cues
#[derive(Parser)]
#[command(name = "cuebridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bridge
    Serve {
        /// Configuration file path (built-in show defaults if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "cuebridge.yaml")]
        config: PathBuf,
    },

    /// Show which cue a reading would fire, without sending anything
    Map {
        /// Configuration file path (built-in show defaults if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Channel name or route (e.g. "galvanic" or "/g")
        #[arg(long)]
        channel: String,

        /// Reading value
        #[arg(long, allow_hyphen_values = true)]
        value: f64,

        /// Baseline for adaptive channels
        #[arg(long, allow_hyphen_values = true)]
        baseline: Option<f64>,
    },

    /// Generate an example configuration file
    Init,
}
