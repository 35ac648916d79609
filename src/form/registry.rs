use serde::{Deserialize, Serialize};

use super::{FieldDescriptor, FieldId, FieldType, FormSchema};

/// Palette entry for one field type.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeInfo {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub icon: String,
    pub display_name: String,
    pub requires_options: bool,
}

pub fn describe(field_type: FieldType) -> FieldTypeInfo {
    let (icon, display_name) = match field_type {
        FieldType::Text => ("type", "Text"),
        FieldType::Email => ("mail", "Email"),
        FieldType::Tel => ("phone", "Phone"),
        FieldType::Textarea => ("align-left", "Text Area"),
        FieldType::Select => ("chevron-down", "Dropdown"),
        FieldType::Checkbox => ("check-square", "Checkboxes"),
        FieldType::Radio => ("circle-dot", "Multiple Choice"),
        FieldType::Date => ("calendar", "Date"),
        FieldType::Number => ("hash", "Number"),
    };

    FieldTypeInfo {
        field_type,
        icon: icon.to_string(),
        display_name: display_name.to_string(),
        requires_options: field_type.requires_options(),
    }
}

pub fn describe_all() -> Vec<FieldTypeInfo> {
    FieldType::ALL.iter().copied().map(describe).collect()
}

/// Builds a fresh descriptor for `field_type`.
///
/// The generated name is `field_<position_hint>`, bumped until it is free in
/// `schema`, so appending to a schema never collides with existing keys.
pub fn create_default(
    field_type: FieldType,
    position_hint: usize,
    schema: &FormSchema,
) -> FieldDescriptor {
    let mut n = position_hint.max(1);
    let mut name = format!("field_{}", n);
    while schema.name_taken(&name, None) {
        n += 1;
        name = format!("field_{}", n);
    }

    let options = if field_type.requires_options() {
        vec!["Option 1".to_string()]
    } else {
        vec![]
    };

    FieldDescriptor {
        id: FieldId::new(),
        name,
        label: format!("{} field", describe(field_type).display_name),
        field_type,
        required: false,
        placeholder: None,
        description: None,
        options,
        validation: None,
    }
}

/// `name` if no other field uses it, otherwise the first free `name_<n>`
/// counting from 2.
pub fn unique_name(name: &str, schema: &FormSchema, except: Option<FieldId>) -> String {
    if !schema.name_taken(name, except) {
        return name.to_string();
    }

    (2..)
        .map(|n| format!("{}_{}", name, n))
        .find(|candidate| !schema.name_taken(candidate, except))
        .unwrap_or_else(|| name.to_string())
}
