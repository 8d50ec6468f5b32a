//! Command-line argument parsing for modelbench
//!
//! clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};

/// modelbench - exercise a local AI engine from the terminal
#[derive(Parser, Debug)]
#[command(name = "modelbench")]
#[command(version)]
#[command(about = "Seed a starter model, download the engine model, generate text", long_about = None)]
pub struct Args {
    /// One-shot prompt to send to the engine
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Engine model tag (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Engine host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Engine port (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Verbosity level: default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except results)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive console
    Start,

    /// Run system diagnostics and health checks
    Doctor,

    /// Copy the bundled starter model into local storage
    Install,

    /// Download the engine model (with progress)
    Download,

    /// Show engine and storage status
    Status,

    /// Display current configuration
    Config,

    /// Clean harness state
    Clean {
        /// Also remove installed model files
        #[arg(long)]
        models: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Reject ambiguous combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && self.prompt.is_some() {
            return Err("Cannot specify a prompt with a subcommand.".to_string());
        }
        Ok(())
    }
}

impl Verbosity {
    /// Check if progress bars should be shown
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if detailed events should be shown
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
