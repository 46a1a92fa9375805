//! CLI module for pokedex
//!
//! Provides command-line interface for:
//! - load: validate records and insert them
//! - list: print a sample of stored records
//! - reset: drop every stored record
//! - validate: dry-run validation of a data file
//! - schema: print the store-side validator

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    list_records, load_records, reset_records, run, run_command, run_utility, validate_values,
    Utility,
};
pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_records, read_values, write_error, write_response};
