//! Console slash commands
//!
//! Parsing for the built-in `/` commands; execution lives in the session
//! loop because most commands need the engine client.

use colored::Colorize;

/// Console command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Install,
    Download,
    History { limit: Option<usize> },
    Clear,
    Exit,
    Unknown { input: String },
}

/// Check if input is a command (starts with /)
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/')
}

/// Parse input string into a command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return Command::Unknown {
            input: input.to_string(),
        };
    }

    let parts: Vec<&str> = trimmed[1..].split_whitespace().collect();
    if parts.is_empty() {
        return Command::Unknown {
            input: input.to_string(),
        };
    }

    match parts[0].to_lowercase().as_str() {
        "help" | "h" => Command::Help,
        "status" => Command::Status,
        "install" => Command::Install,
        "download" | "dl" => Command::Download,
        "history" => {
            let limit = parts.get(1).and_then(|s| s.parse().ok());
            Command::History { limit }
        }
        "clear" | "cls" => Command::Clear,
        "exit" | "quit" | "q" => Command::Exit,
        _ => Command::Unknown {
            input: input.to_string(),
        },
    }
}

/// Display help information
pub fn show_help() {
    println!("\n{}", "Available Commands:".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    let commands = [
        ("/help, /h", "Show this help message"),
        ("/status", "Show engine and storage status"),
        ("/install", "Copy the bundled starter model into storage"),
        ("/download, /dl", "Download the engine model"),
        ("/history [n]", "Show last n exchanges (default: 10)"),
        ("/clear, /cls", "Clear screen"),
        ("/exit, /quit, /q", "Exit the console"),
    ];

    for (cmd, desc) in commands {
        println!("  {:<20} {}", cmd.green(), desc);
    }

    println!("\n{}", "Usage:".bold());
    println!("  - Type a prompt directly (no / prefix) to generate text");
    println!("  - Download the engine model once before generating");
    println!();
}
