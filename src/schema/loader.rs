//! Schema loader: JSON Schema document to dereferenced rule tree
//!
//! The loader reads the subset of JSON Schema the rule tree can express:
//! `type`, `properties`, `required`, `additionalProperties`, `items`, `enum`,
//! `minimum`, `maximum`, `title`, plus local references into `definitions`
//! or `$defs`. Every `$ref` is inlined exactly once, so the resulting
//! `Schema` has no references left and needs no definition table.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{ObjectRule, Rule, Schema};

/// Keywords that would need a richer rule tree than `Rule`.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "if",
    "patternProperties",
    "dependencies",
];

/// Definition tables a local `$ref` may point into.
const DEFINITION_TABLES: &[&str] = &["definitions", "$defs"];

/// Resolves a JSON Schema document into a `Schema`.
pub struct SchemaLoader<'a> {
    root: &'a Value,
    document: &'a Map<String, Value>,
    /// Definitions indexed by their full reference (`#/definitions/Stat`)
    definitions: BTreeMap<String, &'a Value>,
}

impl<'a> SchemaLoader<'a> {
    /// Creates a loader for the given document and indexes its definitions.
    pub fn new(root: &'a Value) -> SchemaResult<Self> {
        let document = root
            .as_object()
            .ok_or_else(|| SchemaError::malformed("", "schema document must be an object"))?;

        let mut definitions = BTreeMap::new();
        for table in DEFINITION_TABLES {
            let Some(entries) = document.get(*table) else {
                continue;
            };
            let entries = entries.as_object().ok_or_else(|| {
                SchemaError::malformed(format!("/{}", table), "definitions must be an object")
            })?;
            for (name, definition) in entries {
                definitions.insert(format!("#/{}/{}", table, escape_pointer(name)), definition);
            }
        }

        Ok(Self {
            root,
            document,
            definitions,
        })
    }

    #[cfg(test)]
    fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Builds the flat rule tree.
    pub fn load(&self) -> SchemaResult<Schema> {
        let mut chain = Vec::new();
        let root = self.resolve(self.root, "", &mut chain)?;

        let title = match self.document.get("title") {
            None => None,
            Some(Value::String(title)) => Some(title.clone()),
            Some(_) => return Err(SchemaError::malformed("/title", "title must be a string")),
        };

        Ok(Schema { title, root })
    }

    /// Resolves one schema node, following references.
    ///
    /// `chain` holds the references currently being expanded.
    fn resolve(&self, node: &Value, location: &str, chain: &mut Vec<String>) -> SchemaResult<Rule> {
        let obj = match node {
            Value::Bool(true) => return Ok(Rule::Any),
            Value::Object(obj) => obj,
            _ => {
                return Err(SchemaError::malformed(
                    location,
                    "schema node must be an object or `true`",
                ))
            }
        };

        if let Some(reference) = obj.get("$ref") {
            return self.resolve_ref(reference, location, chain);
        }

        for keyword in UNSUPPORTED_KEYWORDS {
            if obj.contains_key(*keyword) {
                return Err(SchemaError::unsupported(location, keyword));
            }
        }

        match node_type(obj, location)? {
            NodeType::Any => Ok(Rule::Any),
            NodeType::Boolean => Ok(Rule::Boolean),
            NodeType::String => Ok(Rule::String {
                allowed: string_enum(obj, location)?,
            }),
            NodeType::Integer => Ok(Rule::Integer {
                minimum: integer_bound(obj, "minimum", location)?,
                maximum: integer_bound(obj, "maximum", location)?,
            }),
            NodeType::Number => Ok(Rule::Number {
                minimum: number_bound(obj, "minimum", location)?,
                maximum: number_bound(obj, "maximum", location)?,
            }),
            NodeType::Array => {
                let items = match obj.get("items") {
                    None => Rule::Any,
                    Some(items) => self.resolve(items, &format!("{}/items", location), chain)?,
                };
                Ok(Rule::Array {
                    items: Box::new(items),
                })
            }
            NodeType::Object => self.resolve_object(obj, location, chain).map(Rule::Object),
        }
    }

    fn resolve_ref(
        &self,
        reference: &Value,
        location: &str,
        chain: &mut Vec<String>,
    ) -> SchemaResult<Rule> {
        let reference = reference.as_str().ok_or_else(|| {
            SchemaError::malformed(format!("{}/$ref", location), "$ref must be a string")
        })?;

        let target = self
            .definitions
            .get(reference)
            .ok_or_else(|| SchemaError::unknown_ref(location, reference))?;

        if chain.iter().any(|seen| seen == reference) {
            let mut cycle = chain.clone();
            cycle.push(reference.to_string());
            return Err(SchemaError::ref_cycle(location, &cycle));
        }

        chain.push(reference.to_string());
        let target_location = reference.trim_start_matches('#').to_string();
        let rule = self.resolve(target, &target_location, chain);
        chain.pop();
        rule
    }

    fn resolve_object(
        &self,
        obj: &Map<String, Value>,
        location: &str,
        chain: &mut Vec<String>,
    ) -> SchemaResult<ObjectRule> {
        let mut rule = ObjectRule::default();

        if let Some(properties) = obj.get("properties") {
            let properties = properties.as_object().ok_or_else(|| {
                SchemaError::malformed(format!("{}/properties", location), "properties must be an object")
            })?;
            for (name, property) in properties {
                let property_location =
                    format!("{}/properties/{}", location, escape_pointer(name));
                let resolved = self.resolve(property, &property_location, chain)?;
                rule.properties.insert(name.clone(), resolved);
            }
        }

        if let Some(required) = obj.get("required") {
            rule.required = string_array(required).ok_or_else(|| {
                SchemaError::malformed(
                    format!("{}/required", location),
                    "required must be an array of strings",
                )
            })?;
        }

        match obj.get("additionalProperties") {
            None => {}
            Some(Value::Bool(allowed)) => rule.additional_properties = *allowed,
            Some(Value::Object(_)) => {
                return Err(SchemaError::unsupported(
                    format!("{}/additionalProperties", location),
                    "additionalProperties (schema form)",
                ))
            }
            Some(_) => {
                return Err(SchemaError::malformed(
                    format!("{}/additionalProperties", location),
                    "additionalProperties must be a boolean",
                ))
            }
        }

        Ok(rule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeType {
    Any,
    Boolean,
    String,
    Integer,
    Number,
    Array,
    Object,
}

/// Reads `type`, or infers it from the keywords present.
fn node_type(obj: &Map<String, Value>, location: &str) -> SchemaResult<NodeType> {
    match obj.get("type") {
        Some(Value::String(name)) => match name.as_str() {
            "boolean" => Ok(NodeType::Boolean),
            "string" => Ok(NodeType::String),
            "integer" => Ok(NodeType::Integer),
            "number" => Ok(NodeType::Number),
            "array" => Ok(NodeType::Array),
            "object" => Ok(NodeType::Object),
            other => Err(SchemaError::unsupported(
                format!("{}/type", location),
                &format!("type '{}'", other),
            )),
        },
        Some(Value::Array(_)) => Err(SchemaError::unsupported(
            format!("{}/type", location),
            "type (array form)",
        )),
        Some(_) => Err(SchemaError::malformed(
            format!("{}/type", location),
            "type must be a string",
        )),
        None => {
            let has = |k: &str| obj.contains_key(k);
            if has("properties") || has("required") || has("additionalProperties") {
                Ok(NodeType::Object)
            } else if has("items") {
                Ok(NodeType::Array)
            } else if has("enum") {
                Ok(NodeType::String)
            } else if has("minimum") || has("maximum") {
                Ok(NodeType::Number)
            } else {
                Ok(NodeType::Any)
            }
        }
    }
}

fn string_enum(obj: &Map<String, Value>, location: &str) -> SchemaResult<Option<Vec<String>>> {
    match obj.get("enum") {
        None => Ok(None),
        Some(values) => string_array(values).map(Some).ok_or_else(|| {
            SchemaError::unsupported(format!("{}/enum", location), "enum with non-string values")
        }),
    }
}

fn integer_bound(obj: &Map<String, Value>, keyword: &str, location: &str) -> SchemaResult<Option<i64>> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            SchemaError::malformed(
                format!("{}/{}", location, keyword),
                format!("{} of an integer must be a whole number", keyword),
            )
        }),
    }
}

fn number_bound(obj: &Map<String, Value>, keyword: &str, location: &str) -> SchemaResult<Option<f64>> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            SchemaError::malformed(
                format!("{}/{}", location, keyword),
                format!("{} must be a number", keyword),
            )
        }),
    }
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Escapes a key for use as a JSON pointer segment.
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
