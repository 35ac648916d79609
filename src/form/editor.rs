use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::registry::{create_default, unique_name};
use super::render::{render_read_only, FormState, RenderedForm};
use super::{is_valid_field_name, FieldDescriptor, FieldId, FieldType, FieldValidation, FormSchema};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum EditorMode {
    Edit,
    Preview,
}

/// Keys to overwrite on a field. `None` leaves the key untouched; the
/// nested options of `placeholder`, `description` and `validation` allow
/// clearing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldUpdate {
    pub name: Option<String>,
    pub label: Option<String>,
    pub required: Option<bool>,
    pub placeholder: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub validation: Option<Option<FieldValidation>>,
}

/// Interactive builder over a form schema.
///
/// Holds the schema being edited plus transient view state (selection and
/// mode). Every operation that changes the schema returns `true` and passes
/// the new schema to the change listener; anything that does not apply
/// (unknown id, index out of range, removing the last option) is a no-op
/// returning `false`.
pub struct SchemaEditor {
    schema: FormSchema,
    selected: Option<FieldId>,
    mode: EditorMode,
    listener: Option<Box<dyn FnMut(&FormSchema)>>,
}

impl SchemaEditor {
    pub fn new(schema: FormSchema) -> SchemaEditor {
        SchemaEditor {
            schema,
            selected: None,
            mode: EditorMode::Edit,
            listener: None,
        }
    }

    pub fn on_change(mut self, listener: impl FnMut(&FormSchema) + 'static) -> SchemaEditor {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn into_schema(self) -> FormSchema {
        self.schema
    }

    pub fn selected(&self) -> Option<&FieldDescriptor> {
        self.selected.and_then(|field_id| self.schema.field(field_id))
    }

    pub fn select(&mut self, field_id: FieldId) -> bool {
        if self.schema.field(field_id).is_none() {
            return false;
        }

        self.selected = Some(field_id);
        true
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) -> EditorMode {
        self.mode = match self.mode {
            EditorMode::Edit => EditorMode::Preview,
            EditorMode::Preview => EditorMode::Edit,
        };
        self.mode
    }

    /// What end users would see, available only in preview mode.
    pub fn preview(&self, state: &FormState) -> Option<RenderedForm> {
        match self.mode {
            EditorMode::Preview => Some(render_read_only(&self.schema, state)),
            EditorMode::Edit => None,
        }
    }

    pub fn add_field(&mut self, field_type: FieldType) -> FieldId {
        let field = create_default(field_type, self.schema.len() + 1, &self.schema);
        let field_id = field.id;
        debug!(%field_id, %field_type, name = %field.name, "adding field");

        self.schema.fields.push(field);
        self.selected = Some(field_id);
        self.changed();

        field_id
    }

    pub fn remove_field(&mut self, field_id: FieldId) -> bool {
        let index = match self.schema.position(field_id) {
            Some(index) => index,
            None => return false,
        };

        debug!(%field_id, "removing field");
        self.schema.fields.remove(index);
        if self.selected == Some(field_id) {
            self.selected = None;
        }
        self.changed();

        true
    }

    /// Moves the field at `from` to `to`, shifting the fields in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.schema.len();
        if from == to || from >= len || to >= len {
            return false;
        }

        debug!(from, to, "reordering fields");
        let field = self.schema.fields.remove(from);
        self.schema.fields.insert(to, field);
        self.changed();

        true
    }

    /// Shallow-merges `update` into the field. A name already used by
    /// another field is suffixed until unique; an invalid name is ignored.
    pub fn edit_field(&mut self, field_id: FieldId, update: FieldUpdate) -> bool {
        let name = update
            .name
            .filter(|name| is_valid_field_name(name))
            .map(|name| unique_name(&name, &self.schema, Some(field_id)));

        let field = match self.field_mut(field_id) {
            Some(field) => field,
            None => return false,
        };
        let before = field.clone();

        if let Some(name) = name {
            field.name = name;
        }
        if let Some(label) = update.label {
            field.label = label;
        }
        if let Some(required) = update.required {
            field.required = required;
        }
        if let Some(placeholder) = update.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(description) = update.description {
            field.description = description;
        }
        if let Some(validation) = update.validation {
            field.validation = validation;
        }

        if *field == before {
            return false;
        }

        debug!(%field_id, "edited field");
        self.changed();
        true
    }

    /// Appends `Option <n>` with the lowest n whose value is still free.
    pub fn add_option(&mut self, field_id: FieldId) -> bool {
        let field = match self.choice_field_mut(field_id) {
            Some(field) => field,
            None => return false,
        };

        let label = (1..)
            .map(|n| format!("Option {}", n))
            .find(|label| !field.option_taken(label, None))
            .unwrap_or_default();
        field.options.push(label);
        self.changed();

        true
    }

    /// Relabels one option. Blank labels and labels submitting the same
    /// value as another option are refused.
    pub fn update_option(&mut self, field_id: FieldId, index: usize, value: String) -> bool {
        let field = match self.choice_field_mut(field_id) {
            Some(field) => field,
            None => return false,
        };

        if value.trim().is_empty() || field.option_taken(&value, Some(index)) {
            debug!(%field_id, index, "refusing option label");
            return false;
        }

        match field.options.get_mut(index) {
            Some(option) if *option != value => *option = value,
            _ => return false,
        }
        self.changed();

        true
    }

    /// Removes one option. The last remaining option is never removed.
    pub fn remove_option(&mut self, field_id: FieldId, index: usize) -> bool {
        let field = match self.choice_field_mut(field_id) {
            Some(field) => field,
            None => return false,
        };

        if field.options.len() <= 1 || index >= field.options.len() {
            debug!(%field_id, index, "refusing to remove option");
            return false;
        }

        field.options.remove(index);
        self.changed();

        true
    }

    fn field_mut(&mut self, field_id: FieldId) -> Option<&mut FieldDescriptor> {
        self.schema
            .fields
            .iter_mut()
            .find(|field| field.id == field_id)
    }

    fn choice_field_mut(&mut self, field_id: FieldId) -> Option<&mut FieldDescriptor> {
        self.field_mut(field_id)
            .filter(|field| field.field_type.requires_options())
    }

    fn changed(&mut self) {
        if let Some(listener) = &mut self.listener {
            listener(&self.schema);
        }
    }
}

impl Debug for SchemaEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("SchemaEditor")
            .field("schema", &self.schema)
            .field("selected", &self.selected)
            .field("mode", &self.mode)
            .finish()
    }
}
