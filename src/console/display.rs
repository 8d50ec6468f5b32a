//! Terminal output for the console
//!
//! Banner, status lines, the download progress bar, and the generation
//! spinner. All terminal writes go through this type on the console task.

use crate::sdk::InitProgress;
use colored::Colorize;
use crossterm::{
    cursor,
    execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Spinner/progress tick interval
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Console display manager
pub struct Display {
    show_progress: bool,
}

impl Display {
    pub fn new(show_progress: bool) -> Self {
        Display { show_progress }
    }

    /// Show the startup banner with SDK/engine status
    pub fn show_banner(&self, sdk_version: &str, engine_status: &str, model: &str) {
        let width = 64;
        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", format!("  modelbench {} - Engine Test Console", sdk_version).bold().cyan());
        println!("{}", format!("  Engine: {} | Model: {}", engine_status, model).dimmed());
        println!("{}\n", "=".repeat(width).cyan());
        println!(
            "Type a prompt to generate (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Create the download progress bar (0-100)
    pub fn start_download(&self, model: &str) -> ProgressBar {
        let pb = if self.show_progress {
            ProgressBar::new(100)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} Downloading [{bar:40.cyan/blue}] {pos}% | {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_message(format!("Model: {}", model));
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    /// Apply one progress update to the download bar
    pub fn update_download(&self, pb: &ProgressBar, update: &InitProgress) {
        pb.set_position(update.percent as u64);
        pb.set_message(update.stage.clone());
    }

    /// Create the generation spinner
    pub fn start_generation(&self) -> ProgressBar {
        let pb = if self.show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Generating response...");
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    /// Print an informational line
    pub fn show_info(&self, message: &str) {
        println!("{} {}", "i".cyan(), message);
    }

    /// Print a success line
    pub fn show_success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error line
    pub fn show_error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }

    /// Print a generation response block
    pub fn show_response(&self, response: &str, duration_ms: u64) {
        println!("\n{}", response);
        println!("{}\n", format!("({}ms)", duration_ms).dimmed());
    }

    /// Clear the terminal
    pub fn clear_screen(&self) {
        let _ = execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0));
    }
}
