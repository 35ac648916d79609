use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::violations::Violation;

use super::{
    option_value, Bound, FieldDescriptor, FieldId, FieldType, FieldValue, FormSchema,
    SubmissionPayload,
};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedForm {
    pub read_only: bool,
    pub fields: Vec<RenderedField>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub id: FieldId,
    pub name: String,
    pub label: String,
    pub required: bool,
    pub description: Option<String>,
    pub control: Control,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Control {
    Input {
        input_type: InputType,
        value: String,
        placeholder: Option<String>,
    },
    TextArea {
        value: String,
        placeholder: Option<String>,
    },
    DatePicker {
        value: String,
        min: Option<NaiveDate>,
        max: Option<NaiveDate>,
    },
    Dropdown {
        placeholder: Option<String>,
        choices: Vec<Choice>,
    },
    CheckboxGroup {
        choices: Vec<Choice>,
    },
    RadioGroup {
        choices: Vec<Choice>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Email,
    Tel,
    Number,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Values entered so far, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    values: SubmissionPayload,
}

impl FormState {
    pub fn new() -> FormState {
        FormState::default()
    }

    pub fn values(&self) -> &SubmissionPayload {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .insert(name.to_string(), FieldValue::Text(value.into()));
    }

    pub fn set_number(&mut self, name: &str, value: f64) {
        self.values
            .insert(name.to_string(), FieldValue::Number(value));
    }

    /// Picks the single choice of a dropdown or radio group.
    pub fn choose(&mut self, name: &str, value: impl Into<String>) {
        self.set_text(name, value);
    }

    /// Flips one checkbox of a group on or off.
    pub fn toggle(&mut self, name: &str, option: &str) {
        let entry = self
            .values
            .entry(name.to_string())
            .or_insert_with(|| FieldValue::Choices(vec![]));

        match entry {
            FieldValue::Choices(choices) => {
                if let Some(index) = choices.iter().position(|choice| choice == option) {
                    choices.remove(index);
                } else {
                    choices.push(option.to_string());
                }
            }
            other => *other = FieldValue::Choices(vec![option.to_string()]),
        }
    }

    pub fn clear(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// Collects the payload for `schema`, refusing while any required field
    /// is empty.
    ///
    /// Only keys of fields in the schema are carried over, and checkbox
    /// selections are put back in declaration order.
    pub fn submit(&self, schema: &FormSchema) -> Result<SubmissionPayload, Vec<Violation>> {
        let mut payload = SubmissionPayload::new();
        let mut missing = vec![];

        for field in schema.fields() {
            let value = self.values.get(&field.name).filter(|value| !value.is_empty());

            match value {
                Some(FieldValue::Choices(choices)) if field.field_type == FieldType::Checkbox => {
                    let mut ordered: Vec<String> = field
                        .options
                        .iter()
                        .filter(|option| choices.contains(option))
                        .cloned()
                        .collect();
                    ordered.extend(
                        choices
                            .iter()
                            .filter(|choice| !field.options.contains(choice))
                            .cloned(),
                    );
                    payload.insert(field.name.clone(), FieldValue::Choices(ordered));
                }
                Some(value) => {
                    payload.insert(field.name.clone(), value.clone());
                }
                None if field.required => missing.push(Violation::MissingRequiredField {
                    field_name: field.name.clone(),
                }),
                None => {}
            }
        }

        if missing.is_empty() {
            Ok(payload)
        } else {
            Err(missing)
        }
    }
}

pub fn render(schema: &FormSchema, state: &FormState) -> RenderedForm {
    RenderedForm {
        read_only: false,
        fields: schema
            .fields()
            .iter()
            .map(|field| render_field(field, state.get(&field.name)))
            .collect(),
    }
}

/// Same controls as [`render`], flagged so the caller disables input.
pub fn render_read_only(schema: &FormSchema, state: &FormState) -> RenderedForm {
    RenderedForm {
        read_only: true,
        ..render(schema, state)
    }
}

fn render_field(field: &FieldDescriptor, value: Option<&FieldValue>) -> RenderedField {
    let control = match field.field_type {
        FieldType::Text => input(field, InputType::Text, value),
        FieldType::Email => input(field, InputType::Email, value),
        FieldType::Tel => input(field, InputType::Tel, value),
        FieldType::Number => input(field, InputType::Number, value),
        FieldType::Textarea => Control::TextArea {
            value: text_of(value),
            placeholder: field.placeholder.clone(),
        },
        FieldType::Date => Control::DatePicker {
            value: text_of(value),
            min: date_bound(field.min()),
            max: date_bound(field.max()),
        },
        FieldType::Select => Control::Dropdown {
            placeholder: field.placeholder.clone(),
            choices: field
                .options
                .iter()
                .map(|option| {
                    let value_of_option = option_value(option);
                    Choice {
                        selected: is_chosen(value, option, &value_of_option),
                        value: value_of_option,
                        label: option.clone(),
                    }
                })
                .collect(),
        },
        FieldType::Checkbox => Control::CheckboxGroup {
            choices: label_choices(field, value),
        },
        FieldType::Radio => Control::RadioGroup {
            choices: label_choices(field, value),
        },
    };

    RenderedField {
        id: field.id,
        name: field.name.clone(),
        label: field.label.clone(),
        required: field.required,
        description: field.description.clone(),
        control,
    }
}

fn input(field: &FieldDescriptor, input_type: InputType, value: Option<&FieldValue>) -> Control {
    Control::Input {
        input_type,
        value: text_of(value),
        placeholder: field.placeholder.clone(),
    }
}

// checkbox and radio payloads carry the option label itself
fn label_choices(field: &FieldDescriptor, value: Option<&FieldValue>) -> Vec<Choice> {
    field
        .options
        .iter()
        .map(|option| Choice {
            value: option.clone(),
            label: option.clone(),
            selected: is_chosen(value, option, option),
        })
        .collect()
}

fn is_chosen(value: Option<&FieldValue>, label: &str, option_value: &str) -> bool {
    match value {
        Some(FieldValue::Text(text)) => text == label || text == option_value,
        Some(FieldValue::Choices(choices)) => choices
            .iter()
            .any(|choice| choice == label || choice == option_value),
        _ => false,
    }
}

fn text_of(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::Number(number)) => number.to_string(),
        Some(FieldValue::Choices(choices)) => choices.join(", "),
        None => String::new(),
    }
}

fn date_bound(bound: Option<Bound>) -> Option<NaiveDate> {
    match bound {
        Some(Bound::Date(date)) => Some(date),
        _ => None,
    }
}
