//! pokedex - schema-validated loading of Pokédex records into a document store
//!
//! Three single-step utilities share one Record schema and one store:
//! load (validate, then insert), list (bounded sample), and cleanup (drop all).

pub mod cli;
pub mod observability;
pub mod ops;
pub mod record;
pub mod schema;
pub mod store;
