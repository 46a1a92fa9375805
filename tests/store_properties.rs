//! Store Property Tests
//!
//! End-to-end behaviour of load, list and reset against the in-memory store:
//! - Conforming records are persisted and can be sampled back
//! - Rejected records leave the store unchanged
//! - Samples never exceed their limit
//! - Reset is idempotent and leaves nothing behind

use pokedex::ops::{FailureKind, Inspector, Loader, Reset};
use pokedex::record::Record;
use pokedex::schema::{Definition, Schema};
use pokedex::store::{MemoryStore, Store};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn record(value: Value) -> Record {
    Record::try_from(value).unwrap()
}

fn schema() -> Schema {
    Definition::default().schema().unwrap()
}

fn prepared_store() -> MemoryStore {
    let schema = schema();
    let mut store = MemoryStore::new();
    Loader::new(&mut store, &schema).prepare().unwrap();
    store
}

fn names(records: &[Record]) -> Vec<&str> {
    records.iter().filter_map(Record::name).collect()
}

// =============================================================================
// Load then Inspect
// =============================================================================

/// Every valid record loaded is retrievable.
#[test]
fn test_loaded_records_are_retrievable() {
    let schema = schema();
    let mut store = prepared_store();
    let starters = ["Bulbasaur", "Charmander", "Squirtle"];
    let elements = ["Grass", "Fire", "Water"];

    {
        let mut loader = Loader::new(&mut store, &schema);
        for (name, element) in starters.iter().zip(elements) {
            let outcome = loader
                .load(&record(json!({ "name": name, "element": [element] })))
                .unwrap();
            assert!(outcome.id.is_some());
        }
    }

    let sample = Inspector::new(&store).sample(Some(10)).unwrap();
    assert_eq!(names(&sample), starters.to_vec());
}

/// Assigned identifiers appear on the stored records.
#[test]
fn test_assigned_id_is_stored() {
    let schema = schema();
    let mut store = prepared_store();
    let outcome = Loader::new(&mut store, &schema)
        .load(&record(json!({ "name": "Mew" })))
        .unwrap();

    let sample = Inspector::new(&store).sample(None).unwrap();
    let id = outcome.id.unwrap();
    assert_eq!(sample[0].get("_id"), Some(&json!(id.as_str())));
}

// =============================================================================
// Rejection Leaves Store Unchanged
// =============================================================================

/// Invalid records are rejected without any write.
#[test]
fn test_invalid_records_leave_store_unchanged() {
    let schema = schema();
    let mut store = prepared_store();
    Loader::new(&mut store, &schema)
        .load(&record(json!({ "name": "Ivysaur", "element": ["Grass"] })))
        .unwrap();
    let before = store.sample(100).unwrap();

    let invalid = [
        json!({ "name": "Chansey", "stats": { "hp": 300 } }),
        json!({ "name": "Pikachu", "element": ["Electric"] }),
        json!({ "name": "Norberta", "element": ["Flying", "Norwegian Ridge-back"], "stats": "no thanks" }),
        json!({ "element": ["Fire"] }),
    ];
    for candidate in invalid {
        let err = Loader::new(&mut store, &schema)
            .load(&record(candidate))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(!err.errors().is_empty());
    }

    assert_eq!(store.sample(100).unwrap(), before);
}

/// The store-side validator catches records a looser caller schema let through.
#[test]
fn test_store_validator_is_a_distinct_failure() {
    let strict = schema();
    let mut store = MemoryStore::new();
    store.create_collection(Some(&strict)).unwrap();

    let mut loose_definition = Definition::default();
    loose_definition.allow_element("Electric");
    let loose = loose_definition.schema().unwrap();

    let err = Loader::new(&mut store, &loose)
        .load(&record(json!({ "name": "Pikachu", "element": ["Electric"] })))
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Constraint);
    assert!(store.is_empty());
}

/// An unreachable store is reported as a connection failure.
#[test]
fn test_unreachable_store_is_connection_failure() {
    let schema = schema();
    let mut store = MemoryStore::unreachable();
    let err = Loader::new(&mut store, &schema).prepare().unwrap_err();
    assert_eq!(err.kind(), FailureKind::Connection);
}

// =============================================================================
// Sample Limits
// =============================================================================

/// A limit of 5 never yields more than 5 records, whatever the store size.
#[test]
fn test_sample_never_exceeds_limit() {
    let schema = schema();
    for size in [0usize, 1, 4, 5, 6, 50] {
        let mut store = prepared_store();
        {
            let mut loader = Loader::new(&mut store, &schema);
            for i in 0..size {
                loader.load(&record(json!({ "name": format!("mon-{}", i) }))).unwrap();
            }
        }
        let sample = Inspector::new(&store).sample(Some(5)).unwrap();
        assert_eq!(sample.len(), size.min(5));
    }
}

// =============================================================================
// Reset
// =============================================================================

/// Reset followed by inspect yields nothing.
#[test]
fn test_reset_then_inspect_is_empty() {
    let schema = schema();
    let mut store = prepared_store();
    Loader::new(&mut store, &schema)
        .load(&record(json!({ "name": "Charmander", "element": ["Fire"] })))
        .unwrap();

    Reset::new(&mut store).run().unwrap();
    assert!(Inspector::new(&store).sample(None).unwrap().is_empty());
}

/// Reset twice in a row leaves the same empty state each time.
#[test]
fn test_reset_is_idempotent() {
    let schema = schema();
    let mut store = prepared_store();
    Loader::new(&mut store, &schema)
        .load(&record(json!({ "name": "Squirtle", "element": ["Water"] })))
        .unwrap();

    Reset::new(&mut store).run().unwrap();
    let first = Inspector::new(&store).sample(None).unwrap();
    Reset::new(&mut store).run().unwrap();
    let second = Inspector::new(&store).sample(None).unwrap();

    assert!(first.is_empty());
    assert_eq!(first, second);
    assert!(!store.collection_exists());
}

/// Loading after a reset recreates the collection.
#[test]
fn test_load_after_reset() {
    let schema = schema();
    let mut store = prepared_store();
    Reset::new(&mut store).run().unwrap();

    let mut loader = Loader::new(&mut store, &schema);
    loader.prepare().unwrap();
    loader.load(&record(json!({ "name": "Bulbasaur" }))).unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.has_validator());
}
