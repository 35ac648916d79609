use tracing::info;

use crate::campaign::manager;
use crate::database::Database;
use crate::error::Error;
use crate::form::editor::{FieldUpdate, SchemaEditor};
use crate::form::{FieldType, FieldValidation, FormSchema};

pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    db.drop_database().await?;

    let campaign = manager::create_campaign(
        db,
        "Spring Launch".to_string(),
        Some("Landing page for the spring brand refresh offer".to_string()),
    )
    .await?;
    let campaign = manager::update_campaign_form(db, campaign, true, contact_form()).await?;

    info!(campaign_id = %campaign.id, "seeded demo campaign");

    Ok(())
}

fn contact_form() -> FormSchema {
    let mut editor = SchemaEditor::new(FormSchema::new());

    let name = editor.add_field(FieldType::Text);
    editor.edit_field(
        name,
        FieldUpdate {
            name: Some("full_name".into()),
            label: Some("Full name".into()),
            required: Some(true),
            validation: Some(Some(FieldValidation {
                max_length: Some(120),
                ..Default::default()
            })),
            ..Default::default()
        },
    );

    let email = editor.add_field(FieldType::Email);
    editor.edit_field(
        email,
        FieldUpdate {
            name: Some("contact_email".into()),
            label: Some("Email".into()),
            required: Some(true),
            placeholder: Some(Some("you@company.com".into())),
            ..Default::default()
        },
    );

    let services = editor.add_field(FieldType::Checkbox);
    editor.edit_field(
        services,
        FieldUpdate {
            name: Some("services".into()),
            label: Some("What can we help with?".into()),
            ..Default::default()
        },
    );
    editor.update_option(services, 0, "Brand Strategy".into());
    for label in ["Web Design", "Campaign Production"] {
        editor.add_option(services);
        let count = editor
            .schema()
            .field(services)
            .map_or(0, |field| field.options.len());
        editor.update_option(services, count.saturating_sub(1), label.into());
    }

    let brief = editor.add_field(FieldType::Textarea);
    editor.edit_field(
        brief,
        FieldUpdate {
            name: Some("brief".into()),
            label: Some("Tell us about the project".into()),
            description: Some(Some("Goals, audience and timing".into())),
            ..Default::default()
        },
    );

    editor.into_schema()
}
