//! Rule tree for dereferenced schemas
//!
//! Supported rules:
//! - any: accepts every value
//! - string: UTF-8 string, optionally restricted to an enumeration
//! - integer: whole number with optional inclusive bounds
//! - number: any JSON number with optional inclusive bounds
//! - boolean
//! - array: homogeneous array with one item rule
//! - object: declared properties, required names, additional-property policy
//!
//! A `Rule` never contains a reference; `SchemaLoader` resolves every `$ref`
//! before a tree is built.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use super::errors::SchemaResult;
use super::validator::{self, ValidationReport};

/// A single validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// No constraint
    Any,
    /// UTF-8 string
    String {
        /// Allowed values, `None` means unrestricted
        allowed: Option<Vec<String>>,
    },
    /// Integer with inclusive bounds
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    /// Any number with inclusive bounds
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    /// Boolean
    Boolean,
    /// Homogeneous array
    Array {
        /// Item rule (boxed to allow recursive trees)
        items: Box<Rule>,
    },
    /// Object with its own property rules
    Object(ObjectRule),
}

impl Rule {
    /// Returns the rule name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Rule::Any => "any",
            Rule::String { .. } => "string",
            Rule::Integer { .. } => "integer",
            Rule::Number { .. } => "number",
            Rule::Boolean => "boolean",
            Rule::Array { .. } => "array",
            Rule::Object(_) => "object",
        }
    }

    /// Exports this rule as a MongoDB `$jsonSchema` fragment.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Rule::Any => json!({}),
            Rule::String { allowed } => {
                let mut out = Map::new();
                out.insert("type".into(), json!("string"));
                if let Some(values) = allowed {
                    out.insert("enum".into(), json!(values));
                }
                Value::Object(out)
            }
            Rule::Integer { minimum, maximum } => {
                let mut out = Map::new();
                out.insert("bsonType".into(), json!(["int", "long"]));
                if let Some(min) = minimum {
                    out.insert("minimum".into(), json!(min));
                }
                if let Some(max) = maximum {
                    out.insert("maximum".into(), json!(max));
                }
                Value::Object(out)
            }
            Rule::Number { minimum, maximum } => {
                let mut out = Map::new();
                out.insert("type".into(), json!("number"));
                if let Some(min) = minimum {
                    out.insert("minimum".into(), json!(min));
                }
                if let Some(max) = maximum {
                    out.insert("maximum".into(), json!(max));
                }
                Value::Object(out)
            }
            Rule::Boolean => json!({ "type": "boolean" }),
            Rule::Array { items } => json!({
                "type": "array",
                "items": items.to_json_schema(),
            }),
            Rule::Object(object) => object.to_json_schema(),
        }
    }
}

/// Property rules of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRule {
    /// Declared properties, sorted by name
    pub properties: BTreeMap<String, Rule>,
    /// Names that must be present
    pub required: Vec<String>,
    /// Whether undeclared properties are accepted
    pub additional_properties: bool,
}

impl Default for ObjectRule {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: true,
        }
    }
}

impl ObjectRule {
    fn to_json_schema(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), json!("object"));
        if !self.properties.is_empty() {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, rule)| (name.clone(), rule.to_json_schema()))
                .collect();
            out.insert("properties".into(), Value::Object(properties));
        }
        if !self.required.is_empty() {
            out.insert("required".into(), json!(self.required));
        }
        out.insert(
            "additionalProperties".into(),
            json!(self.additional_properties),
        );
        Value::Object(out)
    }
}

/// A fully dereferenced, self-contained schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Schema title, taken from the document's `title` keyword if present
    pub title: Option<String>,
    /// Root rule
    pub root: Rule,
}

impl Schema {
    /// Create a schema from a root rule
    pub fn new(root: Rule) -> Self {
        Self { title: None, root }
    }

    /// Builds a schema from a JSON Schema document, resolving `$ref`s.
    pub fn from_document(document: &Value) -> SchemaResult<Self> {
        super::loader::SchemaLoader::new(document)?.load()
    }

    /// Validates a candidate document against this schema.
    ///
    /// Never mutates the document. Every violation is reported.
    pub fn validate(&self, document: &Value) -> ValidationReport {
        validator::validate(&self.root, document)
    }

    /// Exports the schema as a MongoDB `$jsonSchema` validator body.
    ///
    /// The output is inline: it carries no `definitions` and no `$ref`.
    pub fn to_json_schema(&self) -> Value {
        let mut out = self.root.to_json_schema();
        if let (Some(title), Value::Object(map)) = (&self.title, &mut out) {
            map.insert("title".into(), json!(title));
        }
        out
    }
}
