//! Command-line argument parsing for docqa
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docqa - Ask questions about any document using local models
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Ask questions about any document with local retrieval-augmented generation", long_about = None)]
pub struct Args {
    /// Text file to load (entered interactively when omitted)
    #[arg(value_name = "DOCUMENT")]
    pub document: Option<PathBuf>,

    /// Answer this question and exit (repeatable)
    #[arg(short, long = "ask", value_name = "QUESTION")]
    pub ask: Vec<String>,

    /// Number of passages used as context
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    /// Target passage size in words
    #[arg(long, value_name = "WORDS", global = true)]
    pub chunk_size: Option<usize>,

    /// Hugging Face id of the embedding model
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Hugging Face id of the generation model
    #[arg(long)]
    pub generation_model: Option<String>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress everything except answers and errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show how a document is split into passages (no models needed)
    Chunk {
        /// Text file to split
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,
    },

    /// Display current configuration
    Config,
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

    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && (self.document.is_some() || !self.ask.is_empty()) {
            return Err("Cannot specify a document or questions with a subcommand.".to_string());
        }

        if !self.ask.is_empty() && self.document.is_none() {
            return Err("--ask requires a DOCUMENT path.".to_string());
        }

        Ok(())
    }

    /// True when questions were given on the command line
    pub fn is_one_shot(&self) -> bool {
        !self.ask.is_empty()
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Log level for this crate's events
    pub fn log_level(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should list retrieved passages with each answer
    pub fn show_passages(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
