use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};
use crate::violations::Violation;

pub mod editor;
pub mod endpoints;
pub mod registry;
pub mod render;
pub mod validate;
pub use endpoints::*;

pub type FieldId = TypedId<FieldDescriptor>;

/// Payload keyed by field `name`.
pub type SubmissionPayload = BTreeMap<String, FieldValue>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Date,
    Number,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Date,
        FieldType::Number,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Date => "date",
            FieldType::Number => "number",
        }
    }

    pub fn requires_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Checkbox | FieldType::Radio
        )
    }

    /// Types whose value is free text and so take length and pattern rules.
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            FieldType::Text | FieldType::Email | FieldType::Tel | FieldType::Textarea
        )
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FieldTypeParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|field_type| field_type.as_str() == s)
            .ok_or_else(|| FieldTypeParseError {
                tag: s.to_string(),
            })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldTypeParseError {
    pub tag: String,
}

impl Display for FieldTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "unknown field type {:?}", self.tag)
    }
}

impl std::error::Error for FieldTypeParseError {}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl TypedIdMarker for FieldDescriptor {
    fn tag() -> &'static str {
        "FLD"
    }
}

impl FieldDescriptor {
    /// Whether `value` names one of the declared options, either by its
    /// display label or by the value derived from it.
    pub fn accepts_choice(&self, value: &str) -> bool {
        self.options
            .iter()
            .any(|option| option == value || option_value(option) == value)
    }

    /// Whether an option other than the one at `except` submits the same
    /// value as `label`.
    pub fn option_taken(&self, label: &str, except: Option<usize>) -> bool {
        let value = option_value(label);
        self.options
            .iter()
            .enumerate()
            .any(|(index, option)| Some(index) != except && option_value(option) == value)
    }

    fn min(&self) -> Option<Bound> {
        self.validation.as_ref().and_then(|validation| validation.min)
    }

    fn max(&self) -> Option<Bound> {
        self.validation.as_ref().and_then(|validation| validation.max)
    }
}

/// Stable payload value for an option label: lowercased, spaces become
/// underscores.
pub fn option_value(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('$')
        && !name.contains('.')
        && !name.chars().any(char::is_whitespace)
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,
}

/// A `min`/`max` limit: numeric for number fields, a calendar date for
/// date fields.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    Date(NaiveDate),
}

impl Bound {
    fn fits(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (Bound::Number(_), FieldType::Number) | (Bound::Date(_), FieldType::Date)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Choices(Vec<String>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Choices(choices) => choices.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> FieldValue {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> FieldValue {
        FieldValue::Text(text)
    }
}

impl From<f64> for FieldValue {
    fn from(number: f64) -> FieldValue {
        FieldValue::Number(number)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(choices: Vec<String>) -> FieldValue {
        FieldValue::Choices(choices)
    }
}

/// An ordered form definition. Field order is display and tab order.
///
/// Serialized as a bare array of descriptors so it can be stored verbatim
/// on the owning campaign.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FormSchema {
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    pub fn new() -> FormSchema {
        FormSchema { fields: vec![] }
    }

    pub fn from_json(json: &str) -> Result<FormSchema, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, field_id: FieldId) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.id == field_id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn position(&self, field_id: FieldId) -> Option<usize> {
        self.fields.iter().position(|field| field.id == field_id)
    }

    /// Whether a field other than `except` already uses `name`.
    pub fn name_taken(&self, name: &str, except: Option<FieldId>) -> bool {
        self.fields
            .iter()
            .any(|field| field.name == name && Some(field.id) != except)
    }

    /// Integrity problems in the schema itself. Editor operations keep these
    /// from arising, but imported or hand-edited documents are not trusted.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = vec![];
        let mut seen = HashSet::new();
        let mut seen_ids = HashSet::new();

        for field in &self.fields {
            if !seen_ids.insert(field.id) {
                violations.push(Violation::DuplicateFieldId {
                    field_id: field.id,
                    field_name: field.name.clone(),
                });
            }

            if !is_valid_field_name(&field.name) {
                violations.push(Violation::InvalidFieldName {
                    field_id: field.id,
                    field_name: field.name.clone(),
                });
            } else if !seen.insert(field.name.as_str()) {
                violations.push(Violation::DuplicateFieldName {
                    field_name: field.name.clone(),
                });
            }

            if field.field_type.requires_options() && field.options.is_empty() {
                violations.push(Violation::MissingOptions {
                    field_name: field.name.clone(),
                });
            }

            // options must submit distinct values
            let mut seen_options = HashSet::new();
            for option in &field.options {
                if !seen_options.insert(option_value(option)) {
                    violations.push(Violation::DuplicateOption {
                        field_name: field.name.clone(),
                        option: option.clone(),
                    });
                }
            }

            let validation = match &field.validation {
                Some(validation) => validation,
                None => continue,
            };

            if let Some(pattern) = &validation.pattern {
                if Regex::new(&anchored(pattern)).is_err() {
                    violations.push(Violation::InvalidPattern {
                        field_name: field.name.clone(),
                        pattern: pattern.clone(),
                    });
                }
            }

            for bound in validation.min.iter().chain(validation.max.iter()) {
                if !bound.fits(field.field_type) {
                    violations.push(Violation::InvalidBound {
                        field_name: field.name.clone(),
                        field_type: field.field_type,
                        bound: *bound,
                    });
                }
            }
        }

        violations
    }
}

impl From<Vec<FieldDescriptor>> for FormSchema {
    fn from(fields: Vec<FieldDescriptor>) -> FormSchema {
        FormSchema { fields }
    }
}

impl From<FormSchema> for Vec<FieldDescriptor> {
    fn from(schema: FormSchema) -> Vec<FieldDescriptor> {
        schema.fields
    }
}

// patterns must match the whole value, like the html `pattern` attribute
fn anchored(pattern: &str) -> String {
    format!("^(?:{})$", pattern)
}
