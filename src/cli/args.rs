//! Command-line argument parsing for ragworkshop
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::harness::Difficulty;
use crate::workshop::Exercise;

/// ragworkshop - hands-on retrieval-augmented generation exercises
#[derive(Parser, Debug)]
#[command(name = "ragworkshop")]
#[command(author, version)]
#[command(about = "Run and grade RAG workshop exercises against a local Ollama server", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grade an exercise over a corpus's test cases
    Run {
        /// word-overlap, embedding, simple-rag or agentic-rag
        exercise: Exercise,

        /// Corpus JSON file
        #[arg(long)]
        corpus: PathBuf,

        /// Only run cases of this difficulty
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },

    /// Answer one question with a generation exercise
    Ask {
        question: String,

        /// Corpus JSON file
        #[arg(long)]
        corpus: PathBuf,

        /// simple or agentic
        #[arg(long, default_value = "agentic")]
        exercise: Exercise,
    },

    /// Display current configuration
    Config,

    /// Check that Ollama and the configured models are available
    Doctor,
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

    /// Log filter for this level; Normal defers to the configured filter
    pub fn log_filter(&self, configured: &str) -> String {
        match self {
            Verbosity::Quiet => "ragworkshop=error".to_string(),
            Verbosity::Normal => configured.to_string(),
            Verbosity::Verbose => "ragworkshop=info".to_string(),
            Verbosity::VeryVerbose => "ragworkshop=debug".to_string(),
        }
    }

    /// Check if should show per-case answers and agent searches
    pub fn show_details(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
