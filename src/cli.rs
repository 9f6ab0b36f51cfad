//! Command-line interface definition for synthdata
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// synthdata - describe a dataset, get a schema, generate rows
///
/// Talks to a schema/data generation backend. Generation requests need a
/// signed-in session (`synthdata login`).
#[derive(Parser, Debug, Clone)]
#[command(name = "synthdata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Backend base URL (overrides config and SYNTHDATA_BACKEND_URL)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Client state database (overrides config and SYNTHDATA_STORE)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "SYNTHDATA_PASSWORD", hide_env_values = true)]
        password: String,

        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },

    /// Sign in and store the session locally
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SYNTHDATA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session and clear local state
    Logout,

    /// Show the current session and today's remaining requests
    Whoami,

    /// Show how many generation requests are left today
    Quota,

    /// Generate a schema from a natural-language description
    Schema {
        /// What the dataset should contain
        #[arg(short, long)]
        description: String,

        /// Model to use (mistral, claude, llama)
        #[arg(short, long)]
        model: Option<String>,

        /// Number of columns (1-15)
        #[arg(long)]
        columns: Option<u32>,

        /// Write the schema JSON here for editing or `synthdata data`
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Generate rows matching a schema file
    Data {
        /// Schema JSON produced by `synthdata schema` (may be hand-edited)
        #[arg(short, long)]
        schema: PathBuf,

        /// Model to use (mistral, claude, llama)
        #[arg(short, long)]
        model: Option<String>,

        /// Number of rows (1-500)
        #[arg(short, long)]
        rows: Option<u32>,

        /// Output format (json, csv)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file; defaults to synthetic-data.<format>
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Convert a JSON array of rows to JSON or CSV
    Export {
        /// JSON file with an array of row objects, or a saved data response
        #[arg(short, long)]
        input: PathBuf,

        /// Output format (json, csv)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Interactive guided flow: sign in, schema, data, export
    Wizard,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
