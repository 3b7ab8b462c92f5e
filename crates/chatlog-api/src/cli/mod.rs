//! CLI command definitions for the `chatlog` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod replay;
pub mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Log chat widget transcripts to a document store.
#[derive(Parser)]
#[command(name = "chatlog", version, about, long_about = None)]
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

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "CHATLOG_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the transcript logging server.
    Serve {
        /// Port to listen on (defaults to `server.port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` in config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Keep documents in memory instead of the configured store.
        #[arg(long)]
        memory: bool,
    },

    /// Replay widget events (JSON lines) through the relay.
    Replay {
        /// Events file; reads stdin when omitted.
        file: Option<PathBuf>,

        /// Logging endpoint (defaults to `relay.endpoint` in config.toml).
        #[arg(long)]
        endpoint: Option<String>,

        /// Session id to continue; a new one is generated when omitted.
        #[arg(long)]
        session: Option<String>,

        /// Email supplied by the host page.
        #[arg(long)]
        email: Option<String>,
    },

    /// Show the stored conversation for a session.
    Show {
        /// Session id to look up.
        session_id: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
