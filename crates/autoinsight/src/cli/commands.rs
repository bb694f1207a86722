//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Score command arguments.
#[derive(Debug, Args)]
pub struct ScoreCommand {
    /// Path to the vibration CSV (falls back to the configured default source)
    pub source: Option<PathBuf>,

    /// JSON file of disturbance windows from the event-detection feed
    #[arg(short, long, value_name = "FILE")]
    pub windows: Option<PathBuf>,

    /// Record the scored journey in storage
    #[arg(short, long)]
    pub record: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Journey analytics commands.
#[derive(Debug, Subcommand)]
pub enum JourneysCommand {
    /// List recently scored journeys
    List {
        /// Maximum number of journeys to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show aggregate journey statistics
    Stats {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Validate, seal, and store a profile record
    Set {
        /// JSON file containing the profile record
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the stored profile
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        /// Show the opaque sealed blob instead of the record
        #[arg(long)]
        sealed: bool,
    },

    /// Delete the stored profile
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file (defaults to the standard location)
        file: Option<PathBuf>,
    },
}
