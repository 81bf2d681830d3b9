//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// OpsCopilot - neighborhood-aware seller analytics copilot
#[derive(Debug, Parser)]
#[command(
    name = "oc",
    about = "Ask questions about seller data through a tool-calling LLM",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the chat API
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask one question and print the validated answer as JSON
    Ask {
        /// The seller's question
        question: String,

        /// Allow the neighborhood context tool
        #[arg(short, long)]
        neighborhood: bool,
    },

    /// List the tools the model would be offered
    Tools {
        /// Include tools that need neighborhood context
        #[arg(short, long)]
        neighborhood: bool,
    },

    /// Check a JSON file against the answer contract
    Validate {
        /// File holding a candidate answer
        file: PathBuf,
    },
}
