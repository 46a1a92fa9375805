//! The Record schema definition
//!
//! The rules are kept as a JSON Schema document, with stats sharing a single
//! `Stat` definition through `$ref`. `Definition::schema()` dereferences the
//! document into a `Schema` once; callers validate against that.

use serde_json::{json, Value};

use super::errors::SchemaResult;
use super::types::Schema;

/// Element types known so far. More will be added as they are seen.
pub const DEFAULT_ELEMENTS: &[&str] = &["Grass", "Poison", "Fire", "Water"];

/// Stat names accepted inside `stats`.
pub const STAT_NAMES: &[&str] = &["hp", "attack", "defense", "spattack", "spdefense", "speed"];

/// Inclusive bounds of a single stat.
pub const STAT_MIN: i64 = 0;
pub const STAT_MAX: i64 = 255;

/// How undeclared top-level Record fields are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Undeclared top-level fields are accepted
    #[default]
    Permissive,
    /// Undeclared top-level fields are rejected
    Strict,
}

/// Parameters of the Record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    elements: Vec<String>,
    strictness: Strictness,
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            elements: DEFAULT_ELEMENTS.iter().map(|e| e.to_string()).collect(),
            strictness: Strictness::Permissive,
        }
    }
}

impl Definition {
    /// Adds an element type to the enumeration. Duplicates are ignored.
    pub fn allow_element(&mut self, element: impl Into<String>) -> &mut Self {
        let element = element.into();
        if !self.elements.contains(&element) {
            self.elements.push(element);
        }
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Returns the declarative schema document, `$ref`s intact.
    pub fn document(&self) -> Value {
        let stats: serde_json::Map<String, Value> = STAT_NAMES
            .iter()
            .map(|name| (name.to_string(), json!({ "$ref": "#/definitions/Stat" })))
            .collect();

        json!({
            "title": "Pokemon",
            "type": "object",
            "definitions": {
                "Stat": {
                    "type": "integer",
                    "minimum": STAT_MIN,
                    "maximum": STAT_MAX,
                },
            },
            "required": ["name"],
            "properties": {
                "_id": {},
                "name": { "type": "string" },
                "element": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": self.elements,
                    },
                },
                "stats": {
                    "type": "object",
                    "properties": stats,
                    "additionalProperties": false,
                },
                "misc": {
                    "type": "object",
                    "properties": {
                        "sex_ratios": { "type": "object" },
                        "classification": { "type": "string" },
                    },
                    "additionalProperties": true,
                },
            },
            "additionalProperties": self.strictness == Strictness::Permissive,
        })
    }

    /// Dereferences the document into a ready-to-use `Schema`.
    pub fn schema(&self) -> SchemaResult<Schema> {
        Schema::from_document(&self.document())
    }
}
