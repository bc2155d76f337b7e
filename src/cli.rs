//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::resources::AFTER_CURSOR_HEADER;

/// OneLogin API command-line client
#[derive(Parser, Debug)]
#[command(name = "onelogin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "ONELOGIN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "ONELOGIN_LOG_LEVEL", global = true)]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "ONELOGIN_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Acquire an access token and print it
    Token,

    /// Read a single resource
    Get {
        /// Resource path, e.g. /api/2/apps
        path: String,

        /// Resource identifier appended to the path
        #[arg(long)]
        id: Option<String>,
    },

    /// List a collection, following pagination cursors
    List {
        /// Collection path, e.g. /api/2/users
        path: String,

        /// Response header carrying the next-page cursor
        #[arg(long, default_value = AFTER_CURSOR_HEADER)]
        cursor_header: String,
    },

    /// List applications
    Apps,

    /// List users
    Users,
}
