//! Display manager for the terminal UI
//!
//! Spinners while models load and documents are indexed, and colored
//! output for answers, passages and errors.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::Verbosity;
use crate::rag::{Passage, RAGResult, RetrievedPassage};

/// Display manager for REPL UI
pub struct DisplayManager {
    verbosity: Verbosity,
    update_interval: Duration,
}

impl DisplayManager {
    pub fn new(verbosity: Verbosity) -> Self {
        DisplayManager {
            verbosity,
            update_interval: Duration::from_millis(100),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, embedding_model: &str, generation_model: &str) {
        if !self.verbosity.show_progress() {
            return;
        }

        let width = 64;
        let rule = "=".repeat(width);
        let title = format!("  docqa {} - Ask questions about a document", version);
        let info = format!("  Embedder: {} | Generator: {}", embedding_model, generation_model);

        println!("\n{}", rule.cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", rule.cyan());
    }

    /// Show how to use the question loop
    pub fn show_usage(&self) {
        if !self.verbosity.show_progress() {
            return;
        }
        println!(
            "Ask a question (or {} for commands, {} to quit)\n",
            "/help".green(),
            "exit".green()
        );
    }

    /// Spinner for a long-running step; hidden in quiet mode
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.verbosity.show_progress() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.update_interval);
        pb
    }

    /// Finish a spinner with a success line
    pub fn finish(&self, pb: &ProgressBar, message: &str) {
        pb.finish_and_clear();
        if self.verbosity.show_progress() {
            println!("{} {}", "✓".green(), message);
        }
    }

    /// Show an answer, plus the passages behind it when verbose
    pub fn show_answer(&self, result: &RAGResult) {
        if self.verbosity.show_passages() {
            self.show_retrieved(&result.passages);
        }
        println!("{} {}\n", "Answer:".bold().green(), result.answer);
    }

    /// Show retrieved passages with their distances
    pub fn show_retrieved(&self, passages: &[RetrievedPassage]) {
        if passages.is_empty() {
            println!("{}", "  (no passages retrieved)".dimmed());
            return;
        }
        for retrieved in passages {
            println!(
                "  {} passage {} (distance: {:.4})",
                format!("#{}", retrieved.rank + 1).cyan(),
                retrieved.passage.index,
                retrieved.distance
            );
            println!("    {}", preview(&retrieved.passage.text, 160).dimmed());
        }
    }

    /// List passages of the loaded document
    pub fn show_passages(&self, passages: &[Passage]) {
        if passages.is_empty() {
            println!("{}", "No passages (document is empty).".yellow());
            return;
        }
        for passage in passages {
            println!(
                "{} {}",
                format!("[{}]", passage.index).cyan().bold(),
                format!("{} words", passage.word_count).dimmed()
            );
            println!("{}\n", passage.text);
        }
    }

    pub fn show_help(&self) {
        println!("{}", "Commands:".bold());
        println!("  {:<16} {}", "/load <path>".green(), "Load a new document (replaces the current one)");
        println!("  {:<16} {}", "/passages".green(), "List passages of the current document");
        println!("  {:<16} {}", "/help".green(), "Show this help");
        println!("  {:<16} {}", "exit".green(), "Quit");
        println!("Anything else is treated as a question.\n");
    }

    pub fn show_info(&self, message: &str) {
        if self.verbosity.show_progress() {
            println!("{}", message.cyan());
        }
    }

    pub fn show_error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}

/// Shorten text to at most `max_chars` characters
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short", 10), "short");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(20);
        let shortened = preview(&text, 10);
        assert_eq!(shortened.chars().count(), 10);
        assert!(shortened.ends_with("..."));
    }

    #[test]
    fn test_quiet_spinner_is_hidden() {
        let display = DisplayManager::new(Verbosity::Quiet);
        assert!(display.spinner("working").is_hidden());
    }
}
