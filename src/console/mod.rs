//! Interactive console for exercising the engine
//!
//! The console task owns all terminal state: it renders startup status,
//! drives the model download with a progress bar, and forwards prompts to
//! the engine. Background work (download, generation, the blocking starter
//! install) reports back through channels or join handles only.

pub mod commands;
pub mod display;
pub mod input;
pub mod session;

use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cli::Verbosity;
use crate::console::commands::Command;
use crate::console::display::Display;
use crate::console::input::InputHandler;
use crate::console::session::{AskRecord, SessionHistory};
use crate::installer::ModelInstaller;
use crate::sdk::types::format_size;
use crate::sdk::EngineClient;

/// Console session coordinator
pub struct ConsoleSession {
    client: EngineClient,
    installer: ModelInstaller,
    input: InputHandler,
    display: Display,
    history: SessionHistory,
    verbosity: Verbosity,
}

impl ConsoleSession {
    /// Create a console session with persistent prompt history
    pub fn new(
        client: EngineClient,
        installer: ModelInstaller,
        verbosity: Verbosity,
    ) -> Result<Self> {
        let history_path = dirs::home_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(".modelbench_history");

        Ok(ConsoleSession {
            client,
            installer,
            input: InputHandler::with_history(history_path)?,
            display: Display::new(verbosity.show_progress()),
            history: SessionHistory::new(),
            verbosity,
        })
    }

    /// Main console loop
    pub async fn run(&mut self) -> Result<()> {
        self.show_startup_status().await;

        loop {
            match self.input.read_line() {
                Ok(Some(input)) => {
                    if input.is_empty() {
                        continue;
                    }

                    if commands::is_command(&input) {
                        if !self.handle_command(commands::parse(&input)).await {
                            break;
                        }
                    } else {
                        self.handle_prompt(&input).await;
                    }
                }
                Ok(None) => {
                    // EOF (Ctrl-D) - exit gracefully
                    break;
                }
                Err(e) => {
                    if e.to_string().contains("Interrupted") {
                        println!("\nUse /exit to quit gracefully");
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        self.input.save_history()?;
        Ok(())
    }

    /// Render the startup banner and initial status
    async fn show_startup_status(&self) {
        let engine_status = if self.client.health_check().await {
            match self.client.engine_version().await {
                Ok(version) => format!("Connected (v{})", version),
                Err(_) => "Connected".to_string(),
            }
        } else {
            "Not Connected".to_string()
        };

        self.display
            .show_banner(self.client.sdk_version(), &engine_status, self.client.model());

        if self.installer.is_available() {
            if self.verbosity.show_events() {
                self.display.show_info(&format!(
                    "Starter model installed: {}",
                    self.installer.model_path().display()
                ));
            }
        } else {
            self.display
                .show_info("Starter model not installed. Run /install to seed it.");
        }

        if !self.client.is_ready().await {
            self.display
                .show_info("Engine model not downloaded. Run /download before generating.");
        }
    }

    /// Execute a slash command; returns false when the session should end
    async fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Help => commands::show_help(),
            Command::Exit => {
                println!("{}", "Goodbye!".green());
                return false;
            }
            Command::Clear => self.display.clear_screen(),
            Command::History { limit } => self.show_history(limit.unwrap_or(10)),
            Command::Status => self.show_status().await,
            Command::Install => self.run_install().await,
            Command::Download => self.run_download().await,
            Command::Unknown { input } => {
                println!("{}", format!("Unknown command: {}", input).red());
                println!("Type {} for available commands", "/help".cyan());
            }
        }
        true
    }

    /// Copy the bundled starter model into storage
    ///
    /// The copy is blocking by contract, so it runs on the blocking pool.
    async fn run_install(&self) {
        let installer = self.installer.clone();
        let already = installer.is_available();

        let result = tokio::task::spawn_blocking(move || installer.install()).await;

        match result {
            Ok(Ok(path)) => {
                if already {
                    self.display
                        .show_info(&format!("Starter model already installed: {}", path.display()));
                } else {
                    self.display
                        .show_success(&format!("Starter model installed: {}", path.display()));
                }
            }
            Ok(Err(e)) => self.display.show_error(&format!("Install failed: {}", e)),
            Err(e) => self.display.show_error(&format!("Install task failed: {}", e)),
        }
    }

    /// Download the engine model, rendering progress until the task ends
    async fn run_download(&self) {
        if self.client.is_ready().await {
            self.display.show_info("Model already downloaded. Engine ready.");
            return;
        }

        let mut task = self.client.initialize();
        let pb = self.display.start_download(self.client.model());

        while let Some(update) = task.next_progress().await {
            self.display.update_download(&pb, &update);
        }
        pb.finish_and_clear();

        match task.join().await {
            Ok(()) => {
                self.display
                    .show_success("Model loaded successfully. Engine ready.");
                self.display
                    .show_info("Type a prompt to test generation.");
            }
            Err(e) => {
                self.display.show_error(&format!("Model download failed: {}", e));
                self.display
                    .show_info("Check your network connection and try again.");
            }
        }
    }

    /// Forward a prompt to the engine and print the response
    async fn handle_prompt(&mut self, prompt: &str) {
        if prompt.trim().is_empty() {
            self.display.show_error("Please enter a prompt first.");
            return;
        }

        if !self.client.is_ready().await {
            self.display
                .show_error("Model is not ready. Run /download first.");
            return;
        }

        let spinner = self.display.start_generation();
        let start = Instant::now();

        match self.client.ask(prompt).await {
            Ok(response) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                spinner.finish_and_clear();
                self.display.show_response(&response, duration_ms);
                self.history.record(AskRecord::new(
                    prompt.to_string(),
                    response,
                    true,
                    duration_ms,
                ));
            }
            Err(e) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                spinner.finish_and_clear();
                self.display.show_error(&format!("Generation failed: {}", e));
                self.history.record(AskRecord::new(
                    prompt.to_string(),
                    e.to_string(),
                    false,
                    duration_ms,
                ));
            }
        }
    }

    /// Print recent exchanges
    fn show_history(&self, limit: usize) {
        if self.history.is_empty() {
            println!("{}", "No exchanges yet.".yellow());
            return;
        }

        println!("\n{}", "Recent exchanges:".bold());
        for record in self.history.recent(limit) {
            let marker = if record.success {
                "✓".green()
            } else {
                "✗".red()
            };
            println!(
                "  {} {} {}",
                marker,
                record.prompt,
                format!("({}ms)", record.duration_ms).dimmed()
            );
        }
        println!();
    }

    /// Print engine and storage status
    async fn show_status(&self) {
        println!("\n{}", "Status".bold());
        println!("{}", "=".repeat(50));

        println!("SDK version:    {}", self.client.sdk_version());
        println!("Engine URL:     {}", self.client.base_url());

        match self.client.engine_version().await {
            Ok(version) => println!("Engine:         Connected (v{})", version),
            Err(_) => println!("Engine:         {}", "Not Connected".red()),
        }

        let ready = self.client.is_ready().await;
        println!(
            "Model:          {} ({})",
            self.client.model(),
            if ready { "ready".to_string() } else { "not downloaded".to_string() }
        );

        if let Ok(models) = self.client.list_models().await {
            for model in models {
                println!("  • {} ({})", model.name, format_size(model.size));
            }
        }

        match self.installer.installed_size() {
            Some(size) => println!(
                "Starter model:  {} ({})",
                self.installer.model_path().display(),
                format_size(size)
            ),
            None => println!("Starter model:  not installed"),
        }

        println!("Exchanges:      {}", self.history.ask_count());
        println!();
    }

    /// Session history accessor
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::BundledAsset;
    use tempfile::TempDir;

    fn test_session(tmp: &TempDir) -> ConsoleSession {
        let client = EngineClient::with_config("http://127.0.0.1:1", "qwen2.5:0.5b").unwrap();
        let installer = ModelInstaller::new(tmp.path(), BundledAsset::starter_model()).unwrap();
        let mut session =
            ConsoleSession::new(client, installer, Verbosity::Quiet).unwrap();
        // Keep test history separate from the user's file
        session.input = InputHandler::with_history(tmp.path().join("history")).unwrap();
        session
    }

    #[tokio::test]
    async fn test_exit_command_ends_session() {
        let tmp = TempDir::new().unwrap();
        let mut session = test_session(&tmp);
        assert!(!session.handle_command(Command::Exit).await);
    }

    #[tokio::test]
    async fn test_help_and_history_continue_session() {
        let tmp = TempDir::new().unwrap();
        let mut session = test_session(&tmp);
        assert!(session.handle_command(Command::Help).await);
        assert!(
            session
                .handle_command(Command::History { limit: Some(3) })
                .await
        );
    }

    #[tokio::test]
    async fn test_install_command_seeds_storage() {
        let tmp = TempDir::new().unwrap();
        let mut session = test_session(&tmp);

        assert!(!session.installer.is_available());
        assert!(session.handle_command(Command::Install).await);
        assert!(session.installer.is_available());
    }

    #[tokio::test]
    async fn test_prompt_rejected_when_engine_not_ready() {
        let tmp = TempDir::new().unwrap();
        let mut session = test_session(&tmp);

        session.handle_prompt("hello").await;
        // Rejected before reaching the engine: nothing recorded
        assert!(session.history().is_empty());
    }
}
