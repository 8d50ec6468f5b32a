//! Input handling for the console using rustyline
//!
//! Line editing with persistent prompt history.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Input handler managing the readline interface and prompt history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: PathBuf,
    prompt: String,
}

impl InputHandler {
    /// Create an input handler, loading prompt history if the file exists
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        if history_file.exists() {
            let _ = editor.load_history(&history_file);
        }

        Ok(InputHandler {
            editor,
            history_path: history_file,
            prompt: "modelbench> ".to_string(),
        })
    }

    /// Read a line of input from the user
    ///
    /// Returns:
    /// - Ok(Some(input)) for normal input (trimmed; may be empty)
    /// - Ok(None) for EOF (Ctrl-D)
    /// - Err on interrupt (Ctrl-C) or other errors
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    return Ok(Some(String::new()));
                }

                let _ = self.editor.add_history_entry(trimmed);

                Ok(Some(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Err(anyhow::anyhow!("Interrupted")),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Save history to disk; called on graceful shutdown
    pub fn save_history(&mut self) -> Result<()> {
        self.editor.save_history(&self.history_path)?;
        Ok(())
    }

    /// Number of history entries currently loaded
    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}
