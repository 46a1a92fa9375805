//! CLI command implementations
//!
//! Each command opens at most one store handle, runs one operation, and
//! drops the handle before returning, on success and on failure alike.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::{error, info};

use crate::observability;
use crate::ops::{Inspector, Loader, Reset};
use crate::record::Record;
use crate::schema::Schema;
use crate::store::{MongoStore, Store};

use super::args::{Cli, Command};
use super::config::{Config, DEFAULT_CONFIG_PATH};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_records, read_values, write_error, write_response};

/// The argument-less entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utility {
    /// Validate and insert the first record of the data file
    Load,
    /// Print a sample of stored records
    List,
    /// Drop every stored record
    Cleanup,
}

impl Utility {
    fn command(self) -> Command {
        match self {
            Utility::Load => Command::Load {
                file: None,
                all: false,
            },
            Utility::List => Command::List { limit: None },
            Utility::Cleanup => Command::Reset,
        }
    }
}

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    observability::init_logging();
    report(Config::load_or_default(&cli.config).and_then(|config| run_command(&config, cli.command)))
}

/// Entry point of an argument-less utility binary
pub fn run_utility(utility: Utility) -> CliResult<()> {
    observability::init_logging();
    report(
        Config::load_or_default(Path::new(DEFAULT_CONFIG_PATH))
            .and_then(|config| run_command(&config, utility.command())),
    )
}

/// Prints the error envelope for a failed run.
///
/// The envelope is the only place the failure is printed. If it cannot be
/// written the failure is logged instead, and the original error is returned.
fn report(result: CliResult<()>) -> CliResult<()> {
    if let Err(e) = &result {
        if let Err(write_err) = write_error(e) {
            error!(code = e.code_str(), error = %e, write_error = %write_err, "could not write error response");
        }
    }
    result
}

/// Run one command and print its JSON response on success
pub fn run_command(config: &Config, cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Load { file, all } => load(config, file, all),
        Command::List { limit } => list(config, limit),
        Command::Reset => reset(config),
        Command::Validate { file } => validate(config, file),
        Command::Schema => schema(config),
    };

    write_response(result?)
}

/// Validate and insert records from the data file
pub fn load(config: &Config, file: Option<PathBuf>, all: bool) -> CliResult<Value> {
    let path = file.unwrap_or_else(|| config.data_file.clone());
    let records = read_records(&path)?;
    let schema = config.definition().schema()?;

    let mut store = MongoStore::connect(&config.store_config())?;
    load_records(&mut store, &schema, &records, all)
}

/// Print up to `limit` stored records
pub fn list(config: &Config, limit: Option<u64>) -> CliResult<Value> {
    let limit = match limit {
        Some(n) => usize::try_from(n)
            .map_err(|_| CliError::config_error(format!("limit {} is too large", n)))?,
        None => config.sample_limit,
    };

    let store = MongoStore::connect(&config.store_config())?;
    list_records(&store, limit)
}

/// Drop every stored record
pub fn reset(config: &Config) -> CliResult<Value> {
    let mut store = MongoStore::connect(&config.store_config())?;
    reset_records(&mut store)
}

/// Check records against the schema; the store is never contacted
pub fn validate(config: &Config, file: Option<PathBuf>) -> CliResult<Value> {
    let path = file.unwrap_or_else(|| config.data_file.clone());
    let values = read_values(&path)?;
    let schema = config.definition().schema()?;
    validate_values(&schema, &values)
}

/// Print the store-side validator built from the schema
pub fn schema(config: &Config) -> CliResult<Value> {
    let schema = config.definition().schema()?;
    Ok(json!({ "$jsonSchema": schema.to_json_schema() }))
}

/// Prepare the collection, then load the first record (or all of them)
pub fn load_records<S: Store>(
    store: &mut S,
    schema: &Schema,
    records: &[Record],
    all: bool,
) -> CliResult<Value> {
    let batch = if all { records } else { &records[..records.len().min(1)] };
    if batch.is_empty() {
        return Err(CliError::data_error("Data file holds no records"));
    }

    let mut loader = Loader::new(store, schema);
    loader.prepare()?;

    info!(count = batch.len(), "loading records");
    let outcomes = loader.load_all(batch)?;
    Ok(json!({ "loaded": outcomes }))
}

/// Sample stored records
pub fn list_records<S: Store>(store: &S, limit: usize) -> CliResult<Value> {
    let records = Inspector::new(store).sample(Some(limit))?;
    Ok(serde_json::to_value(records)?)
}

/// Drop the record collection
pub fn reset_records<S: Store>(store: &mut S) -> CliResult<Value> {
    Reset::new(store).run()?;
    Ok(json!({ "dropped": true }))
}

/// Validate every value, failing when any is invalid
pub fn validate_values(schema: &Schema, values: &[Value]) -> CliResult<Value> {
    let mut details = Vec::new();
    let mut reports = Vec::with_capacity(values.len());

    for (i, value) in values.iter().enumerate() {
        let report = schema.validate(value);
        details.extend(
            report
                .errors()
                .into_iter()
                .map(|error| format!("record {}: {}", i, error)),
        );
        reports.push(json!({
            "index": i,
            "name": value.get("name").and_then(Value::as_str),
            "valid": report.is_valid(),
            "errors": report.errors(),
        }));
    }

    if !details.is_empty() {
        let invalid = reports.iter().filter(|r| r["valid"] == json!(false)).count();
        return Err(CliError::new(
            CliErrorCode::ValidationFailed,
            format!("{} of {} record(s) failed validation", invalid, values.len()),
        )
        .with_details(details));
    }

    Ok(json!({ "checked": values.len(), "records": reports }))
}
