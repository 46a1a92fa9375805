//! # MongoDB Store
//!
//! Blocking MongoDB client scoped to one collection. The client is released
//! when the store is dropped.

use mongodb::bson::{self, doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::sync::{Client, Collection, Database};
use tracing::{debug, info};

use super::errors::{StoreError, StoreResult};
use super::{Store, StoreConfig};
use crate::record::{Record, RecordId};
use crate::schema::Schema;

/// Server error codes the store maps to specific failures
const NAMESPACE_NOT_FOUND: i32 = 26;
const NAMESPACE_EXISTS: i32 = 48;
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;
const DUPLICATE_KEY: i32 = 11000;

pub struct MongoStore {
    // Held so the connection pool lives exactly as long as the store.
    _client: Client,
    database: Database,
    collection: String,
}

impl std::fmt::Debug for MongoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoStore")
            .field("database", &self.database.name())
            .field("collection", &self.collection)
            .finish()
    }
}

impl MongoStore {
    /// Connect to the configured instance and verify it answers a ping.
    pub fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::with_options(client_options(config)?).map_err(classify)?;
        let database = client.database(&config.database);

        database.run_command(doc! { "ping": 1 }).run().map_err(classify)?;

        info!(
            database = %config.database,
            collection = %config.collection,
            "connected to store"
        );

        Ok(Self {
            _client: client,
            database,
            collection: config.collection.clone(),
        })
    }

    fn records(&self) -> Collection<Document> {
        self.database.collection(&self.collection)
    }
}

impl Store for MongoStore {
    fn create_collection(&mut self, validator: Option<&Schema>) -> StoreResult<()> {
        let mut action = self.database.create_collection(&self.collection);
        if let Some(schema) = validator {
            let json_schema = bson::to_document(&schema.to_json_schema())
                .map_err(|e| StoreError::Unexpected(format!("validator encoding: {}", e)))?;
            action = action.validator(doc! { "$jsonSchema": json_schema });
        }

        match action.run() {
            Ok(()) => {
                info!(collection = %self.collection, validated = validator.is_some(), "collection created");
                Ok(())
            }
            Err(e) if command_code(&e) == Some(NAMESPACE_EXISTS) => {
                debug!(collection = %self.collection, "collection already exists");
                Ok(())
            }
            Err(e) => Err(classify(e)),
        }
    }

    fn insert(&mut self, record: &Record) -> StoreResult<Option<RecordId>> {
        let document = bson::to_document(record.fields())
            .map_err(|e| StoreError::Unexpected(format!("record encoding: {}", e)))?;

        let result = self.records().insert_one(document).run().map_err(classify)?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        };
        Ok(Some(RecordId::new(id)))
    }

    fn sample(&self, limit: usize) -> StoreResult<Vec<Record>> {
        let limit = i64::try_from(limit)
            .map_err(|_| StoreError::Unexpected(format!("limit {} too large", limit)))?;
        let cursor = self.records().find(doc! {}).limit(limit).run().map_err(classify)?;

        let mut records = Vec::new();
        for document in cursor {
            let document = document.map_err(classify)?;
            let value = Bson::Document(document).into_relaxed_extjson();
            let record = Record::try_from(value).map_err(|other| {
                StoreError::Unexpected(format!("stored value is not a document: {}", other))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn drop_collection(&mut self) -> StoreResult<()> {
        match self.records().drop().run() {
            Ok(()) => Ok(()),
            Err(e) if command_code(&e) == Some(NAMESPACE_NOT_FOUND) => Ok(()),
            Err(e) => Err(classify(e)),
        }
    }
}

/// Driver options for `config`. Failed operations are reported, never retried.
fn client_options(config: &StoreConfig) -> StoreResult<ClientOptions> {
    let mut options = ClientOptions::parse(&config.uri).run().map_err(classify)?;
    options.retry_writes = Some(false);
    options.retry_reads = Some(false);
    Ok(options)
}

/// Appends the server's `errInfo`, which names the failing fields.
fn rejection_message(message: &str, details: Option<&Document>) -> String {
    match details {
        Some(details) => format!(
            "{}: {}",
            message,
            Bson::Document(details.clone()).into_relaxed_extjson()
        ),
        None => message.to_string(),
    }
}

fn command_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        _ => None,
    }
}

/// Maps a driver error onto the store error taxonomy.
fn classify(err: MongoError) -> StoreError {
    let message = err.to_string();
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => match write.code {
            DUPLICATE_KEY => StoreError::DuplicateKey(write.message.clone()),
            DOCUMENT_VALIDATION_FAILURE => {
                StoreError::Rejected(rejection_message(&write.message, write.details.as_ref()))
            }
            _ => StoreError::Unexpected(message),
        },
        ErrorKind::Command(command) if command.code == DOCUMENT_VALIDATION_FAILURE => {
            StoreError::Rejected(command.message.clone())
        }
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => StoreError::Unavailable(message),
        _ => StoreError::Unexpected(message),
    }
}
