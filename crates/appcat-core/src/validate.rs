//! Validation gate.
//!
//! Checks a candidate document against a [`RecordSchema`] before any
//! persistence is attempted. All violated constraints are collected and
//! reported together so the caller can surface every problem at once.

use std::fmt;

use chrono::DateTime;
use regex::Regex;
use serde_json::Value;

use crate::error::{CatalogError, CatalogResult};
use crate::schema::{FieldKind, RecordSchema};

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Violation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The complete list of violations for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for v in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validate a candidate document for creation.
///
/// Fails with `InvalidArgument` when the candidate is JSON null or not an
/// object at all; otherwise returns `Validation` carrying every violated
/// constraint, or `Ok(())` when all checks pass. Pure function of
/// (candidate, schema).
pub fn validate(candidate: &Value, schema: &RecordSchema) -> CatalogResult<()> {
    let doc = as_document(candidate)?;

    let mut violations = Vec::new();
    for field in &schema.fields {
        match doc.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    violations.push(Violation::new(field.name, "required field is missing"));
                }
            }
            Some(value) => check_value(field.name, value, field, &mut violations),
        }
    }
    flag_unknown_fields(doc, schema, &mut violations);

    finish(violations)
}

/// Validate a partial update document.
///
/// Only the fields present in the patch are checked; required-ness applies
/// at creation, not here. Immutable fields present in a patch are
/// themselves violations.
pub fn validate_patch(patch: &Value, schema: &RecordSchema) -> CatalogResult<()> {
    let doc = as_document(patch)?;

    let mut violations = Vec::new();
    for (name, value) in doc {
        let Some(field) = schema.field(name) else {
            violations.push(Violation::new(name, "unknown field"));
            continue;
        };
        if field.immutable {
            violations.push(Violation::new(name, "field is immutable after creation"));
            continue;
        }
        if value.is_null() {
            continue;
        }
        check_value(name, value, field, &mut violations);
    }

    finish(violations)
}

fn as_document(candidate: &Value) -> CatalogResult<&serde_json::Map<String, Value>> {
    match candidate {
        Value::Null => Err(CatalogError::invalid_argument(
            "candidate record is null or undefined",
        )),
        Value::Object(map) => Ok(map),
        other => Err(CatalogError::invalid_argument(format!(
            "candidate record must be a document, got {}",
            type_name(other)
        ))),
    }
}

fn check_value(
    name: &str,
    value: &Value,
    field: &crate::schema::FieldSpec,
    violations: &mut Vec<Violation>,
) {
    match field.kind {
        FieldKind::Text => {
            let Some(s) = value.as_str() else {
                violations.push(Violation::new(name, "must be a string"));
                return;
            };
            let len = s.chars().count();
            if let Some(min) = field.min_len
                && len < min
            {
                violations.push(Violation::new(
                    name,
                    format!("must be at least {min} characters, got {len}"),
                ));
            }
            if let Some(max) = field.max_len
                && len > max
            {
                violations.push(Violation::new(
                    name,
                    format!("must be at most {max} characters, got {len}"),
                ));
            }
            if let Some(pattern) = field.pattern {
                match Regex::new(pattern) {
                    Ok(re) if re.is_match(s) => {}
                    Ok(_) => violations.push(Violation::new(
                        name,
                        format!("must match pattern {pattern}"),
                    )),
                    Err(e) => violations.push(Violation::new(
                        name,
                        format!("schema pattern does not compile: {e}"),
                    )),
                }
            }
        }
        FieldKind::Int => {
            if !value.is_i64() && !value.is_u64() {
                violations.push(Violation::new(name, "must be an integer"));
            }
        }
        FieldKind::Bool => {
            if !value.is_boolean() {
                violations.push(Violation::new(name, "must be a boolean"));
            }
        }
        FieldKind::DateTime => {
            let ok = value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
            if !ok {
                violations.push(Violation::new(name, "must be an RFC 3339 date-time string"));
            }
        }
    }
}

fn flag_unknown_fields(
    doc: &serde_json::Map<String, Value>,
    schema: &RecordSchema,
    violations: &mut Vec<Violation>,
) {
    for name in doc.keys() {
        // `id` is generated by the store, never part of a candidate.
        if name == "id" || schema.has_field(name) {
            continue;
        }
        violations.push(Violation::new(name, "unknown field"));
    }
}

fn finish(violations: Vec<Violation>) -> CatalogResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(Violations(violations)))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
