//! REPL (Read-Eval-Print Loop) module for interactive question answering
//!
//! Loads one document into the pipeline, then answers questions until the
//! user exits. Built-in commands start with `/`.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::rag::RAGPipeline;
use crate::repl::commands::{parse, Command};
pub use crate::repl::display::DisplayManager;
pub use crate::repl::input::InputHandler;

/// Prompt shown while a document is being pasted
const DOCUMENT_PROMPT: &str = "... ";

/// REPL session coordinator
///
/// Owns the pipeline for the lifetime of the session, along with:
/// - Input handling (rustyline)
/// - Display coordination
pub struct ReplSession {
    pipeline: RAGPipeline,
    input_handler: InputHandler,
    display_manager: DisplayManager,
    questions_answered: usize,
}

impl ReplSession {
    /// Create new REPL session around a configured pipeline
    pub fn new(
        pipeline: RAGPipeline,
        input_handler: InputHandler,
        display_manager: DisplayManager,
    ) -> Self {
        ReplSession {
            pipeline,
            input_handler,
            display_manager,
            questions_answered: 0,
        }
    }

    /// Read a document from disk and load it
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let document = read_document(path)?;
        self.load_text(&document)
            .with_context(|| format!("Failed to process document {}", path.display()))
    }

    /// Chunk, embed and index a document, replacing the current one
    pub fn load_text(&mut self, document: &str) -> Result<()> {
        let pb = self.display_manager.spinner("Indexing document...");
        if let Err(e) = self.pipeline.load(document) {
            pb.finish_and_clear();
            return Err(e.into());
        }

        let passages = self.pipeline.corpus().map(|c| c.len()).unwrap_or(0);
        self.display_manager
            .finish(&pb, &format!("Document indexed ({} passages)", passages));
        Ok(())
    }

    /// Ask the user to paste a document, ending with an empty line
    pub fn prompt_document(&mut self) -> Result<()> {
        self.display_manager
            .show_info("Paste the document, then press Enter on an empty line:");
        let document = self.input_handler.read_block(DOCUMENT_PROMPT)?;
        self.load_text(&document)
    }

    /// Question loop; returns when the user exits
    pub fn run(&mut self) -> Result<()> {
        self.display_manager.show_usage();

        loop {
            let input = match self.input_handler.read_line() {
                Ok(Some(input)) => input,
                Ok(None) => break,
                Err(e) => {
                    self.display_manager.show_error(&e.to_string());
                    break;
                }
            };

            if !self.handle_input(&input) {
                break;
            }
        }

        info!(questions = self.questions_answered, "Session ended");
        self.save()
    }

    /// Handle one line of input
    ///
    /// Returns true if the session should continue, false to exit.
    /// Failures are reported and never end the session.
    pub fn handle_input(&mut self, input: &str) -> bool {
        match parse(input) {
            Command::Empty => {}
            Command::Exit => return false,
            Command::Help => self.display_manager.show_help(),
            Command::Passages => match self.pipeline.corpus() {
                Some(corpus) => self.display_manager.show_passages(corpus.passages()),
                None => self.display_manager.show_error("No document loaded"),
            },
            Command::Load { path } => {
                if let Err(e) = self.load_file(&path) {
                    self.display_manager.show_error(&format!("{:#}", e));
                }
            }
            Command::Question { text } => self.answer(&text),
            Command::Unknown { input } => self.display_manager.show_error(&format!(
                "Unknown command: {} (type /help for commands)",
                input
            )),
        }
        true
    }

    fn answer(&mut self, question: &str) {
        let pb = self.display_manager.spinner("Thinking...");
        let result = self.pipeline.answer_with_details(question);
        pb.finish_and_clear();

        match result {
            Ok(result) => {
                self.questions_answered += 1;
                self.display_manager.show_answer(&result);
            }
            Err(e) => self.display_manager.show_error(&e.to_string()),
        }
    }

    /// Get the pipeline
    pub fn pipeline(&self) -> &RAGPipeline {
        &self.pipeline
    }

    /// Get display manager
    pub fn display(&self) -> &DisplayManager {
        &self.display_manager
    }

    /// Number of questions answered successfully
    pub fn questions_answered(&self) -> usize {
        self.questions_answered
    }

    /// Save session state
    pub fn save(&mut self) -> Result<()> {
        self.input_handler.save_history()
    }
}

/// Read a UTF-8 text document
pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {}", path.display()))
}

/// Configuration for REPL mode
#[derive(Debug, Clone, Default)]
pub struct ReplConfig {
    pub history_file: Option<PathBuf>,
}

impl ReplConfig {
    /// Create config with history file
    pub fn with_history(path: PathBuf) -> Self {
        ReplConfig {
            history_file: Some(path),
        }
    }

    /// Build the input handler this configuration describes
    pub fn input_handler(&self) -> Result<InputHandler> {
        match &self.history_file {
            Some(path) => InputHandler::with_history(path.clone()),
            None => InputHandler::new(),
        }
    }
}
