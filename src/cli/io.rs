//! JSON I/O handling for CLI
//!
//! - Input: a data file holding a JSON array of records (or one record)
//! - Output: one JSON object per command on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::record::Record;

/// Reads the raw JSON values of a data file.
///
/// A top-level array yields its elements; any other value yields itself.
pub fn read_values(path: &Path) -> CliResult<Vec<Value>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::data_error(format!("Failed to read {}: {}", path.display(), e)))?;

    let value: Value = serde_json::from_str(&content)
        .map_err(|e| CliError::data_error(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    Ok(match value {
        Value::Array(values) => values,
        other => vec![other],
    })
}

/// Reads the records of a data file. Every entry must be a JSON object.
pub fn read_records(path: &Path) -> CliResult<Vec<Record>> {
    read_values(path)?
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            Record::try_from(value).map_err(|other| {
                CliError::data_error(format!(
                    "Entry {} of {} is not an object: {}",
                    i,
                    path.display(),
                    other
                ))
            })
        })
        .collect()
}

/// Write a success response to `writer`
pub fn write_response_to<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_response_to(&mut io::stdout().lock(), data)
}

/// Write an error response to `writer`
pub fn write_error_to<W: Write>(writer: &mut W, error: &CliError) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": error.code_str(),
        "message": error.message(),
        "errors": error.details(),
    });

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(error: &CliError) -> CliResult<()> {
    write_error_to(&mut io::stdout().lock(), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_read_array_of_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pokemon.json");
        fs::write(&path, r#"[{ "name": "Bulbasaur" }, { "name": "Ivysaur" }]"#).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name(), Some("Ivysaur"));
    }

    #[test]
    fn test_single_object_is_one_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("one.json");
        fs::write(&path, r#"{ "name": "Mew" }"#).unwrap();
        assert_eq!(read_records(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_non_object_entry_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, r#"[{ "name": "Mew" }, 42]"#).unwrap();

        let err = read_records(&path).unwrap_err();
        assert_eq!(err.code_str(), "POKEDEX_CLI_DATA_ERROR");
        assert!(err.message().contains("Entry 1"));
    }

    #[test]
    fn test_missing_file_is_data_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_values(&tmp.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code_str(), "POKEDEX_CLI_DATA_ERROR");
    }

    #[test]
    fn test_response_envelope() {
        let mut out = Vec::new();
        write_response_to(&mut out, json!([1, 2])).unwrap();
        let written: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(written, json!({ "status": "ok", "data": [1, 2] }));
    }

    #[test]
    fn test_error_envelope() {
        let mut out = Vec::new();
        let error = CliError::data_error("Data file holds no records");
        write_error_to(&mut out, &error).unwrap();
        let written: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(written["status"], "error");
        assert_eq!(written["code"], "POKEDEX_CLI_DATA_ERROR");
        assert_eq!(written["message"], "Data file holds no records");
        assert_eq!(written["errors"], json!([]));
    }
}
