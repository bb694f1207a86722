//! Command-line interface for autoinsight.
//!
//! This module provides the CLI structure and command handlers for the
//! `autoins` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, JourneysCommand, ProfileCommand, ScoreCommand};

/// autoins - Vehicle telemetry scoring and journey analytics
///
/// The command-line surface of the Auto Insight dashboard core: score
/// vibration telemetry against known road disturbances, browse scored
/// journeys, and manage the sealed owner profile.
#[derive(Debug, Parser)]
#[command(name = "autoins")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a vibration telemetry file
    Score(ScoreCommand),

    /// Browse scored journeys
    #[command(subcommand)]
    Journeys(JourneysCommand),

    /// Manage the sealed owner profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
