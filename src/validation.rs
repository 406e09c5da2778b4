//! Explicit field schemas for inbound payloads.
//!
//! Every request body is checked against a [`Schema`] before it is turned into
//! a typed DTO. A schema is a plain table of field names and rules; update
//! schemas are derived from their create counterparts with
//! [`Schema::partial`], which keeps every rule but makes each field optional.

use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::ValidateEmail;

use crate::domain::types::parse_timestamp;

/// Type and range check applied to a single field.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    /// Any JSON number, optionally bounded from below.
    Number { min: Option<f64> },
    /// Whole JSON number, optionally bounded on either side.
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    /// String; must be non-blank unless the field is optional.
    Text,
    Email,
    /// ISO 8601 calendar date (`YYYY-MM-DD`).
    Date,
    /// RFC 3339 timestamp, naive `YYYY-MM-DDTHH:MM:SS` or calendar date.
    DateTime,
    /// Wall-clock time as `HH:MM`.
    Time,
    /// Strict JSON boolean.
    Boolean,
    /// Array whose elements are each checked as non-blank strings.
    TextArray,
    /// Nested object; inherits the partial mode of the parent schema.
    Object(&'static Schema),
    /// Array of nested objects, always checked with the full nested schema.
    ObjectArray(&'static Schema),
}

impl FieldRule {
    pub const fn int_at_least(min: i64) -> Self {
        FieldRule::Integer {
            min: Some(min),
            max: None,
        }
    }

    pub const fn int_between(min: i64, max: i64) -> Self {
        FieldRule::Integer {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// A named field with its rule and optionality.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            rule,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            rule,
            required: false,
        }
    }
}

/// Validation table for one inbound payload shape.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    name: &'static str,
    fields: &'static [FieldSpec],
    partial: bool,
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            name,
            fields,
            partial: false,
        }
    }

    /// Derives the update variant: every field optional, rules unchanged.
    pub const fn partial(self, name: &'static str) -> Self {
        Self {
            name,
            fields: self.fields,
            partial: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Checks `payload` against every field in declaration order.
    ///
    /// All failures are collected; the order of the returned errors follows the
    /// schema, so identical inputs always produce identical reports.
    pub fn validate(&self, payload: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match payload.as_object() {
            Some(object) => check_object(self, object, "", self.partial, &mut errors),
            None => errors.push("$", ValidationErrorKind::NotAnObject),
        }
        errors.into_result()
    }
}

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationErrorKind {
    Missing,
    NotAnObject,
    NotANumber,
    NotAnInteger,
    BelowMinimum { min: f64 },
    AboveMaximum { max: f64 },
    NotAString,
    EmptyString,
    InvalidEmail,
    InvalidDate,
    InvalidDateTime,
    InvalidTime,
    NotABoolean,
    NotAnArray,
    /// Payload passed the schema but could not be decoded into its DTO.
    Malformed { message: String },
}

impl ValidationErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::Missing => "missing",
            ValidationErrorKind::NotAnObject => "not_an_object",
            ValidationErrorKind::NotANumber => "not_a_number",
            ValidationErrorKind::NotAnInteger => "not_an_integer",
            ValidationErrorKind::BelowMinimum { .. } => "below_minimum",
            ValidationErrorKind::AboveMaximum { .. } => "above_maximum",
            ValidationErrorKind::NotAString => "not_a_string",
            ValidationErrorKind::EmptyString => "empty_string",
            ValidationErrorKind::InvalidEmail => "invalid_email",
            ValidationErrorKind::InvalidDate => "invalid_date",
            ValidationErrorKind::InvalidDateTime => "invalid_date_time",
            ValidationErrorKind::InvalidTime => "invalid_time",
            ValidationErrorKind::NotABoolean => "not_a_boolean",
            ValidationErrorKind::NotAnArray => "not_an_array",
            ValidationErrorKind::Malformed { .. } => "malformed",
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(flatten)]
    pub kind: ValidationErrorKind,
}

/// Ordered collection of field failures.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl std::error::Error for ValidationErrors {}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid fields:")?;
        for error in &self.0 {
            write!(f, " {} ({})", error.field, error.kind.code())?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(field: impl Into<String>, kind: ValidationErrorKind) -> Self {
        let mut errors = Self::new();
        errors.push(field, kind);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, kind: ValidationErrorKind) {
        self.0.push(FieldError {
            field: field.into(),
            kind,
        });
    }

    /// Moves every error of `other` into `self`, prefixing the field paths.
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for error in other.0 {
            let field = if error.field == "$" {
                prefix.to_string()
            } else {
                format!("{prefix}.{}", error.field)
            };
            self.0.push(FieldError {
                field,
                kind: error.kind,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Validates `payload` against `schema` and decodes it into `T`.
pub fn parse_payload<T: DeserializeOwned>(
    schema: &Schema,
    payload: Value,
) -> Result<T, ValidationErrors> {
    schema.validate(&payload)?;
    serde_json::from_value(payload).map_err(|err| {
        ValidationErrors::single(
            "$",
            ValidationErrorKind::Malformed {
                message: err.to_string(),
            },
        )
    })
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_object(
    schema: &Schema,
    object: &Map<String, Value>,
    prefix: &str,
    partial: bool,
    errors: &mut ValidationErrors,
) {
    for spec in schema.fields {
        let path = join_path(prefix, spec.name);
        match object.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required && !partial {
                    errors.push(path, ValidationErrorKind::Missing);
                }
            }
            Some(value) => check_value(spec, value, &path, partial, errors),
        }
    }
}

fn check_value(
    spec: &FieldSpec,
    value: &Value,
    path: &str,
    partial: bool,
    errors: &mut ValidationErrors,
) {
    match spec.rule {
        FieldRule::Number { min } => match value.as_f64() {
            None => errors.push(path, ValidationErrorKind::NotANumber),
            Some(number) => {
                if let Some(min) = min.filter(|min| number < *min) {
                    errors.push(path, ValidationErrorKind::BelowMinimum { min });
                }
            }
        },
        FieldRule::Integer { min, max } => match value.as_i64() {
            None => errors.push(path, ValidationErrorKind::NotAnInteger),
            Some(number) => {
                if let Some(min) = min.filter(|min| number < *min) {
                    errors.push(
                        path,
                        ValidationErrorKind::BelowMinimum { min: min as f64 },
                    );
                } else if let Some(max) = max.filter(|max| number > *max) {
                    errors.push(
                        path,
                        ValidationErrorKind::AboveMaximum { max: max as f64 },
                    );
                }
            }
        },
        FieldRule::Text => match value.as_str() {
            None => errors.push(path, ValidationErrorKind::NotAString),
            Some(text) => {
                if spec.required && text.trim().is_empty() {
                    errors.push(path, ValidationErrorKind::EmptyString);
                }
            }
        },
        FieldRule::Email => match value.as_str() {
            None => errors.push(path, ValidationErrorKind::NotAString),
            Some(text) => {
                if !text.trim().to_lowercase().validate_email() {
                    errors.push(path, ValidationErrorKind::InvalidEmail);
                }
            }
        },
        FieldRule::Date => match value.as_str() {
            None => errors.push(path, ValidationErrorKind::NotAString),
            Some(text) => {
                if NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_err() {
                    errors.push(path, ValidationErrorKind::InvalidDate);
                }
            }
        },
        FieldRule::DateTime => match value.as_str() {
            None => errors.push(path, ValidationErrorKind::NotAString),
            Some(text) => {
                if parse_timestamp(text).is_err() {
                    errors.push(path, ValidationErrorKind::InvalidDateTime);
                }
            }
        },
        FieldRule::Time => match value.as_str() {
            None => errors.push(path, ValidationErrorKind::NotAString),
            Some(text) => {
                if NaiveTime::parse_from_str(text.trim(), "%H:%M").is_err() {
                    errors.push(path, ValidationErrorKind::InvalidTime);
                }
            }
        },
        FieldRule::Boolean => {
            if !value.is_boolean() {
                errors.push(path, ValidationErrorKind::NotABoolean);
            }
        }
        FieldRule::TextArray => match value.as_array() {
            None => errors.push(path, ValidationErrorKind::NotAnArray),
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    match item.as_str() {
                        None => errors.push(item_path, ValidationErrorKind::NotAString),
                        Some(text) if text.trim().is_empty() => {
                            errors.push(item_path, ValidationErrorKind::EmptyString)
                        }
                        Some(_) => {}
                    }
                }
            }
        },
        FieldRule::Object(nested) => match value.as_object() {
            None => errors.push(path, ValidationErrorKind::NotAnObject),
            Some(object) => check_object(nested, object, path, partial, errors),
        },
        FieldRule::ObjectArray(nested) => match value.as_array() {
            None => errors.push(path, ValidationErrorKind::NotAnArray),
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    match item.as_object() {
                        None => errors.push(item_path, ValidationErrorKind::NotAnObject),
                        Some(object) => check_object(nested, object, &item_path, false, errors),
                    }
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const ITEM: Schema = Schema::new(
        "Item",
        &[
            FieldSpec::required("codigo", FieldRule::Text),
            FieldSpec::required("quantidade", FieldRule::int_at_least(1)),
        ],
    );

    const CREATE: Schema = Schema::new(
        "Create",
        &[
            FieldSpec::required("nome", FieldRule::Text),
            FieldSpec::required("valor", FieldRule::Number { min: Some(0.0) }),
            FieldSpec::optional("apelido", FieldRule::Text),
            FieldSpec::required("vencimento", FieldRule::Date),
            FieldSpec::optional("ativo", FieldRule::Boolean),
            FieldSpec::optional("anexos", FieldRule::TextArray),
            FieldSpec::optional("itens", FieldRule::ObjectArray(&ITEM)),
        ],
    );

    const UPDATE: Schema = CREATE.partial("Update");

    fn kinds(errors: &ValidationErrors) -> Vec<(&str, &str)> {
        errors
            .errors()
            .iter()
            .map(|e| (e.field.as_str(), e.kind.code()))
            .collect()
    }

    #[test]
    fn accepts_valid_payload() {
        let payload = json!({
            "nome": "Lote 1",
            "valor": 0,
            "vencimento": "2024-02-29",
            "ativo": true,
            "anexos": ["a", "b"],
            "itens": [{"codigo": "x", "quantidade": 2}],
        });
        assert!(CREATE.validate(&payload).is_ok());
    }

    #[test]
    fn reports_all_failures_in_schema_order() {
        let payload = json!({
            "valor": -1,
            "apelido": "",
            "vencimento": "2024-02-30",
            "ativo": "yes",
            "anexos": ["ok", 3, " "],
        });
        let errors = CREATE.validate(&payload).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ("nome", "missing"),
                ("valor", "below_minimum"),
                ("vencimento", "invalid_date"),
                ("ativo", "not_a_boolean"),
                ("anexos[1]", "not_a_string"),
                ("anexos[2]", "empty_string"),
            ]
        );
    }

    #[test]
    fn null_counts_as_absent() {
        let payload = json!({"nome": null, "valor": 1, "vencimento": "2024-01-01"});
        let errors = CREATE.validate(&payload).unwrap_err();
        assert_eq!(kinds(&errors), vec![("nome", "missing")]);
    }

    #[test]
    fn partial_schema_makes_fields_optional_but_keeps_rules() {
        assert!(UPDATE.is_partial());
        assert!(UPDATE.validate(&json!({})).is_ok());
        assert!(UPDATE.validate(&json!({"valor": 10.5})).is_ok());

        let errors = UPDATE.validate(&json!({"nome": "  ", "valor": "10"})).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![("nome", "empty_string"), ("valor", "not_a_number")]
        );
    }

    #[test]
    fn nested_arrays_use_full_schema_even_in_partial_mode() {
        let errors = UPDATE
            .validate(&json!({"itens": [{"codigo": "x"}, {"codigo": "y", "quantidade": 0}]}))
            .unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ("itens[0].quantidade", "missing"),
                ("itens[1].quantidade", "below_minimum"),
            ]
        );
    }

    #[test]
    fn rejects_non_object_payload() {
        let errors = CREATE.validate(&json!([1, 2])).unwrap_err();
        assert_eq!(kinds(&errors), vec![("$", "not_an_object")]);
    }

    #[test]
    fn integer_rule_rejects_fractions() {
        let errors = ITEM
            .validate(&json!({"codigo": "x", "quantidade": 1.5}))
            .unwrap_err();
        assert_eq!(kinds(&errors), vec![("quantidade", "not_an_integer")]);
    }

    #[test]
    fn bounded_integer_rejects_values_past_the_maximum() {
        const BOUNDED: Schema = Schema::new(
            "Bounded",
            &[FieldSpec::required("parcelas", FieldRule::int_between(1, 600))],
        );
        assert!(BOUNDED.validate(&json!({"parcelas": 600})).is_ok());

        let errors = BOUNDED.validate(&json!({"parcelas": 601})).unwrap_err();
        assert_eq!(kinds(&errors), vec![("parcelas", "above_maximum")]);
        assert_eq!(
            errors.errors()[0].kind,
            ValidationErrorKind::AboveMaximum { max: 600.0 }
        );
    }

    #[test]
    fn errors_serialize_with_machine_readable_kind() {
        let errors = ValidationErrors::single("valor", ValidationErrorKind::BelowMinimum { min: 0.0 });
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!([{"field": "valor", "kind": "below_minimum", "min": 0.0}])
        );
    }

    #[test]
    fn merge_prefixed_rewrites_paths() {
        let mut all = ValidationErrors::new();
        all.merge_prefixed("[2]", ValidationErrors::single("nome", ValidationErrorKind::Missing));
        all.merge_prefixed("[3]", ValidationErrors::single("$", ValidationErrorKind::NotAnObject));
        assert_eq!(
            kinds(&all),
            vec![("[2].nome", "missing"), ("[3]", "not_an_object")]
        );
    }
}
