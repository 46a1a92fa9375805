//! CLI argument definitions using clap
//!
//! Commands:
//! - pokedex load [--file <path>] [--all]
//! - pokedex list [--limit <n>]
//! - pokedex reset
//! - pokedex validate [--file <path>]
//! - pokedex schema

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::config::DEFAULT_CONFIG_PATH;

/// pokedex - schema-validated record loading
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when it is missing)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Validate records from the data file and insert them
    Load {
        /// Data file holding a JSON array of records (overrides config)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Load every record instead of only the first
        #[arg(long)]
        all: bool,
    },

    /// Print a sample of stored records
    List {
        /// Maximum number of records to print (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },

    /// Drop every stored record
    Reset,

    /// Check records against the schema without touching the store
    Validate {
        /// Data file holding a JSON array of records (overrides config)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the store-side `$jsonSchema` validator
    Schema,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
