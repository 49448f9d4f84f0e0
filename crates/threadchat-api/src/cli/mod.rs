//! CLI command definitions for the `threadchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod conversation;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Web chat front end persisting conversations for a remote chatbot.
#[derive(Parser)]
#[command(name = "threadchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Chatbot backend base URL (overrides `[backend] base_url`).
    #[arg(long, global = true, env = "THREADCHAT_BACKEND_URL")]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve {
        /// Port to listen on (default from config, 3000).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config, 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
    },

    /// Print a conversation's messages in order.
    Show {
        /// Conversation id.
        id: String,
    },

    /// Delete a conversation and its messages.
    #[command(alias = "rm")]
    Delete {
        /// Conversation id.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
