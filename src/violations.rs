use serde::{Deserialize, Serialize};

use crate::form::{Bound, FieldId, FieldType};

/// A single broken rule, scoped to the field that broke it.
///
/// Schema integrity checks and submission validation both report problems
/// as a list of these rather than failing on the first one, so callers can
/// show a message next to every offending field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Violation {
    DuplicateFieldName {
        field_name: String,
    },
    DuplicateFieldId {
        field_id: FieldId,
        field_name: String,
    },
    InvalidFieldName {
        field_id: FieldId,
        field_name: String,
    },
    MissingOptions {
        field_name: String,
    },
    DuplicateOption {
        field_name: String,
        option: String,
    },
    InvalidPattern {
        field_name: String,
        pattern: String,
    },
    InvalidBound {
        field_name: String,
        field_type: FieldType,
        bound: Bound,
    },
    MissingRequiredField {
        field_name: String,
    },
    UnexpectedField {
        field_name: String,
    },
    UndeclaredOption {
        field_name: String,
        value: String,
    },
    InvalidValueShape {
        field_name: String,
        field_type: FieldType,
    },
    InvalidFormat {
        field_name: String,
        field_type: FieldType,
    },
    TooShort {
        field_name: String,
        min_length: u32,
        length: usize,
    },
    TooLong {
        field_name: String,
        max_length: u32,
        length: usize,
    },
    PatternMismatch {
        field_name: String,
        pattern: String,
    },
    BelowMinimum {
        field_name: String,
        minimum: Bound,
        value: Bound,
    },
    AboveMaximum {
        field_name: String,
        maximum: Bound,
        value: Bound,
    },
}

impl Violation {
    pub fn field_name(&self) -> &str {
        match self {
            Violation::DuplicateFieldName { field_name }
            | Violation::DuplicateFieldId { field_name, .. }
            | Violation::InvalidFieldName { field_name, .. }
            | Violation::MissingOptions { field_name }
            | Violation::DuplicateOption { field_name, .. }
            | Violation::InvalidPattern { field_name, .. }
            | Violation::InvalidBound { field_name, .. }
            | Violation::MissingRequiredField { field_name }
            | Violation::UnexpectedField { field_name }
            | Violation::UndeclaredOption { field_name, .. }
            | Violation::InvalidValueShape { field_name, .. }
            | Violation::InvalidFormat { field_name, .. }
            | Violation::TooShort { field_name, .. }
            | Violation::TooLong { field_name, .. }
            | Violation::PatternMismatch { field_name, .. }
            | Violation::BelowMinimum { field_name, .. }
            | Violation::AboveMaximum { field_name, .. } => field_name,
        }
    }
}
