//! Line input for the REPL using rustyline
//!
//! Questions go through history; pasted document lines do not.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::path::PathBuf;

/// Maximum number of remembered questions
const MAX_HISTORY: usize = 1000;

/// Question prompt
pub const QUESTION_PROMPT: &str = "question> ";

pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    /// Input handler without persistent history
    pub fn new() -> Result<Self> {
        Self::open(None)
    }

    /// Input handler that loads and saves history at `history_file`
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        Self::open(Some(history_file))
    }

    fn open(history_path: Option<PathBuf>) -> Result<Self> {
        let config = EditorConfig::builder()
            .max_history_size(MAX_HISTORY)?
            .history_ignore_dups(true)?
            .auto_add_history(false)
            .build();
        let mut editor = DefaultEditor::with_config(config)?;

        // A missing or unreadable history file just means a fresh history
        if let Some(path) = history_path.as_ref().filter(|p| p.exists()) {
            let _ = editor.load_history(path);
        }

        Ok(InputHandler {
            editor,
            history_path,
            prompt: QUESTION_PROMPT.to_string(),
        })
    }

    pub fn set_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }

    /// Read one question.
    ///
    /// `Ok(None)` on EOF, an empty string for blank lines, `Err` on Ctrl-C.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let prompt = self.prompt.clone();
        let Some(line) = self.read(&prompt)? else {
            return Ok(None);
        };

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            let _ = self.editor.add_history_entry(trimmed);
        }
        Ok(Some(trimmed.to_string()))
    }

    /// Read lines until an empty line or EOF and join them with newlines
    pub fn read_block(&mut self, prompt: &str) -> Result<String> {
        let mut lines = Vec::new();

        while let Some(line) = self.read(prompt)? {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }

        Ok(lines.join("\n"))
    }

    fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => Err(anyhow::anyhow!("Interrupted")),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Write history to disk, creating the parent directory if needed
    pub fn save_history(&mut self) -> Result<()> {
        let Some(path) = &self.history_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.editor.save_history(path)?;
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_has_no_history_file() {
        let handler = InputHandler::new().unwrap();
        assert_eq!(handler.prompt, QUESTION_PROMPT);
        assert!(handler.history_path.is_none());
        assert_eq!(handler.history_len(), 0);
    }

    #[test]
    fn test_set_prompt() {
        let mut handler = InputHandler::new().unwrap();
        handler.set_prompt("ask> ".to_string());
        assert_eq!(handler.prompt, "ask> ");
    }

    #[test]
    fn test_save_without_history_file_is_noop() {
        let mut handler = InputHandler::new().unwrap();
        assert!(handler.save_history().is_ok());
    }

    #[test]
    fn test_history_round_trip_skips_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history");

        {
            let mut handler = InputHandler::with_history(path.clone()).unwrap();
            let _ = handler.editor.add_history_entry("Who is Elias?");
            let _ = handler.editor.add_history_entry("Who is Elias?");
            let _ = handler.editor.add_history_entry("What was lost?");
            handler.save_history().unwrap();
        }

        assert!(path.exists());
        let reopened = InputHandler::with_history(path).unwrap();
        assert_eq!(reopened.history_len(), 2);
    }
}
