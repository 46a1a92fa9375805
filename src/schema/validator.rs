//! Document validation against a dereferenced rule tree
//!
//! Validation semantics:
//! - Every declared property present in the document is checked
//! - Required properties must be present
//! - Closed objects reject undeclared properties
//! - Types match exactly; no coercion (a float never satisfies `integer`)
//! - All violations are collected; the report is all-or-nothing
//!
//! Validation never mutates the document and is deterministic: properties are
//! visited in sorted order.

use serde_json::{Map, Value};

use super::errors::Violation;
use super::types::{ObjectRule, Rule};

/// Outcome of validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns true when no rule was violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the itemised violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns one human-readable message per violation.
    pub fn errors(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Returns true if any violation concerns `field`.
    pub fn has_violation_at(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            return write!(f, "valid");
        }
        write!(f, "{} violation(s): ", self.violations.len())?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

/// Validates `document` against `root`.
pub fn validate(root: &Rule, document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_value(root, document, ROOT_PATH, &mut report.violations);
    report
}

const ROOT_PATH: &str = "$root";

fn check_value(rule: &Rule, value: &Value, path: &str, out: &mut Vec<Violation>) {
    match rule {
        Rule::Any => {}
        Rule::String { allowed } => {
            let Some(s) = value.as_str() else {
                out.push(type_error(path, "string", value));
                return;
            };
            if let Some(allowed) = allowed {
                if !allowed.iter().any(|a| a == s) {
                    out.push(Violation::not_in_enum(path, allowed, s));
                }
            }
        }
        Rule::Integer { minimum, maximum } => {
            let Some(n) = integer_value(value) else {
                out.push(type_error(path, "integer", value));
                return;
            };
            let below = minimum.is_some_and(|min| n < i128::from(min));
            let above = maximum.is_some_and(|max| n > i128::from(max));
            if below || above {
                out.push(Violation::out_of_range(
                    path,
                    describe_bounds("integer", minimum.map(|m| m.to_string()), maximum.map(|m| m.to_string())),
                    n.to_string(),
                ));
            }
        }
        Rule::Number { minimum, maximum } => {
            let Some(n) = value.as_f64() else {
                out.push(type_error(path, "number", value));
                return;
            };
            let below = minimum.is_some_and(|min| n < min);
            let above = maximum.is_some_and(|max| n > max);
            if below || above {
                out.push(Violation::out_of_range(
                    path,
                    describe_bounds("number", minimum.map(|m| m.to_string()), maximum.map(|m| m.to_string())),
                    value.to_string(),
                ));
            }
        }
        Rule::Boolean => {
            if !value.is_boolean() {
                out.push(type_error(path, "boolean", value));
            }
        }
        Rule::Array { items } => {
            let Some(elements) = value.as_array() else {
                out.push(type_error(path, "array", value));
                return;
            };
            for (i, element) in elements.iter().enumerate() {
                check_value(items, element, &format!("{}[{}]", path, i), out);
            }
        }
        Rule::Object(object) => {
            let Some(obj) = value.as_object() else {
                out.push(type_error(path, "object", value));
                return;
            };
            check_object(object, obj, path, out);
        }
    }
}

fn check_object(rule: &ObjectRule, obj: &Map<String, Value>, path: &str, out: &mut Vec<Violation>) {
    for name in &rule.required {
        if !obj.contains_key(name) {
            out.push(Violation::missing_required(make_path(path, name)));
        }
    }

    for (name, property) in &rule.properties {
        if let Some(value) = obj.get(name) {
            check_value(property, value, &make_path(path, name), out);
        }
    }

    if !rule.additional_properties {
        let mut extra: Vec<&String> = obj
            .keys()
            .filter(|key| !rule.properties.contains_key(*key))
            .collect();
        extra.sort();
        for key in extra {
            out.push(Violation::additional_property(make_path(path, key)));
        }
    }
}

/// Returns the value as an integer if it is a JSON integer.
fn integer_value(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

fn describe_bounds(kind: &str, minimum: Option<String>, maximum: Option<String>) -> String {
    match (minimum, maximum) {
        (Some(min), Some(max)) => format!("{} in [{}, {}]", kind, min, max),
        (Some(min), None) => format!("{} >= {}", kind, min),
        (None, Some(max)) => format!("{} <= {}", kind, max),
        (None, None) => kind.to_string(),
    }
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix == ROOT_PATH || prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn type_error(path: &str, expected: &str, actual: &Value) -> Violation {
    Violation::type_mismatch(path, expected, json_type_name(actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::ViolationKind;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn stats_rule() -> Rule {
        let stat = Rule::Integer {
            minimum: Some(0),
            maximum: Some(255),
        };
        let mut properties = BTreeMap::new();
        properties.insert("hp".to_string(), stat.clone());
        properties.insert("speed".to_string(), stat);
        Rule::Object(ObjectRule {
            properties,
            required: Vec::new(),
            additional_properties: false,
        })
    }

    fn sample_root() -> Rule {
        let mut properties = BTreeMap::new();
        properties.insert("name".to_string(), Rule::String { allowed: None });
        properties.insert(
            "element".to_string(),
            Rule::Array {
                items: Box::new(Rule::String {
                    allowed: Some(vec!["Fire".into(), "Water".into()]),
                }),
            },
        );
        properties.insert("stats".to_string(), stats_rule());
        Rule::Object(ObjectRule {
            properties,
            required: vec!["name".into()],
            additional_properties: true,
        })
    }

    #[test]
    fn test_valid_document_passes() {
        let doc = json!({
            "name": "Charmander",
            "element": ["Fire"],
            "stats": { "hp": 39, "speed": 65 }
        });
        let report = validate(&sample_root(), &doc);
        assert!(report.is_valid(), "{}", report);
        assert!(report.errors().is_empty());
    }

    #[test]
    fn test_additional_top_level_fields_allowed() {
        let doc = json!({ "name": "Squirtle", "height": "1'08\"" });
        assert!(validate(&sample_root(), &doc).is_valid());
    }

    #[test]
    fn test_missing_required_field() {
        let doc = json!({ "element": ["Water"] });
        let report = validate(&sample_root(), &doc);
        assert!(!report.is_valid());
        assert_eq!(report.violations()[0].kind, ViolationKind::MissingRequired);
        assert_eq!(report.violations()[0].field, "name");
    }

    #[test]
    fn test_out_of_range_stat() {
        let doc = json!({ "name": "Chansey", "stats": { "hp": 300 } });
        let report = validate(&sample_root(), &doc);
        assert_eq!(report.violations().len(), 1);
        let v = &report.violations()[0];
        assert_eq!(v.field, "stats.hp");
        assert_eq!(v.kind, ViolationKind::OutOfRange);
        assert_eq!(v.expected, "integer in [0, 255]");
        assert_eq!(v.actual, "300");
    }

    #[test]
    fn test_negative_stat_out_of_range() {
        let doc = json!({ "name": "Magikarp", "stats": { "speed": -1 } });
        let report = validate(&sample_root(), &doc);
        assert!(report.has_violation_at("stats.speed"));
    }

    #[test]
    fn test_float_is_not_integer() {
        let doc = json!({ "name": "Pidgey", "stats": { "hp": 40.5 } });
        let report = validate(&sample_root(), &doc);
        let v = &report.violations()[0];
        assert_eq!(v.kind, ViolationKind::TypeMismatch);
        assert_eq!(v.actual, "number");
    }

    #[test]
    fn test_disallowed_stat_key() {
        let doc = json!({ "name": "Mew", "stats": { "hp": 100, "luck": 7 } });
        let report = validate(&sample_root(), &doc);
        assert_eq!(report.violations().len(), 1);
        assert_eq!(report.violations()[0].kind, ViolationKind::AdditionalProperty);
        assert_eq!(report.violations()[0].field, "stats.luck");
    }

    #[test]
    fn test_enum_violation_reports_index() {
        let doc = json!({ "name": "Pikachu", "element": ["Fire", "Electric"] });
        let report = validate(&sample_root(), &doc);
        assert_eq!(report.violations().len(), 1);
        assert_eq!(report.violations()[0].field, "element[1]");
        assert_eq!(report.violations()[0].kind, ViolationKind::NotInEnum);
    }

    #[test]
    fn test_all_violations_collected() {
        let doc = json!({
            "element": ["Flying"],
            "stats": "no thanks"
        });
        let report = validate(&sample_root(), &doc);
        assert_eq!(report.violations().len(), 3);
        assert!(report.has_violation_at("name"));
        assert!(report.has_violation_at("element[0]"));
        assert!(report.has_violation_at("stats"));
    }

    #[test]
    fn test_null_is_a_type_mismatch() {
        let doc = json!({ "name": null });
        let report = validate(&sample_root(), &doc);
        assert_eq!(report.violations()[0].actual, "null");
    }

    #[test]
    fn test_root_must_be_object() {
        let report = validate(&sample_root(), &json!("Bulbasaur"));
        assert_eq!(report.violations()[0].field, "$root");
        assert_eq!(report.violations()[0].expected, "object");
    }

    #[test]
    fn test_validation_is_deterministic() {
        let doc = json!({ "stats": { "zz": 1, "aa": 2, "hp": 999 } });
        let first = validate(&sample_root(), &doc);
        for _ in 0..50 {
            assert_eq!(validate(&sample_root(), &doc), first);
        }
        assert_eq!(first.violations()[1].field, "stats.hp");
        assert_eq!(first.violations()[2].field, "stats.aa");
        assert_eq!(first.violations()[3].field, "stats.zz");
    }

    fn ratio_root() -> Rule {
        let mut properties = BTreeMap::new();
        properties.insert(
            "male".to_string(),
            Rule::Number {
                minimum: Some(0.0),
                maximum: Some(100.0),
            },
        );
        Rule::Object(ObjectRule {
            properties,
            required: Vec::new(),
            additional_properties: true,
        })
    }

    #[test]
    fn test_number_accepts_floats_and_integers() {
        assert!(validate(&ratio_root(), &json!({ "male": 87.5 })).is_valid());
        assert!(validate(&ratio_root(), &json!({ "male": 50 })).is_valid());
        assert!(validate(&ratio_root(), &json!({ "male": 100.0 })).is_valid());
    }

    #[test]
    fn test_number_out_of_range() {
        let report = validate(&ratio_root(), &json!({ "male": 100.5 }));
        assert_eq!(report.violations().len(), 1);
        let violation = &report.violations()[0];
        assert_eq!(violation.field, "male");
        assert_eq!(violation.kind, ViolationKind::OutOfRange);
        assert_eq!(violation.expected, "number in [0, 100]");
        assert_eq!(violation.actual, "100.5");

        let report = validate(&ratio_root(), &json!({ "male": "half" }));
        assert_eq!(report.violations()[0].kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_report_display() {
        let report = validate(&sample_root(), &json!({ "name": 1 }));
        let display = report.to_string();
        assert!(display.starts_with("1 violation(s)"));
        assert!(display.contains("type mismatch"));
    }
}
