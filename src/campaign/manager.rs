use chrono::Utc;

use crate::database::Database;
use crate::error::Error;
use crate::form::FormSchema;

use super::{Campaign, CampaignForm, CampaignId};

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    name: String,
    description: Option<String>,
) -> Result<Campaign, Error> {
    let now = Utc::now();
    let campaign = Campaign {
        id: CampaignId::new(),
        name,
        description,
        form: None,
        created_at: now,
        modified_at: now,
    };

    db.campaigns().insert_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

/// Replaces the campaign's form. The schema is checked for integrity first
/// since it may not have come through the editor.
#[tracing::instrument(skip(db))]
pub async fn update_campaign_form(
    db: &dyn Database,
    campaign: Campaign,
    enabled: bool,
    schema: FormSchema,
) -> Result<Campaign, Error> {
    let violations = schema.violations();
    if !violations.is_empty() {
        return Err(Error::SchemaViolatesRules { violations });
    }

    let form = CampaignForm { enabled, schema };
    db.campaigns()
        .update_campaign_form(campaign, Some(form))
        .await
}

#[tracing::instrument(skip(db))]
pub async fn remove_campaign_form(db: &dyn Database, campaign: Campaign) -> Result<Campaign, Error> {
    if campaign.form.is_none() {
        return Ok(campaign);
    }

    db.campaigns().update_campaign_form(campaign, None).await
}

pub fn expect_enabled_form(campaign: &Campaign) -> Result<&FormSchema, Error> {
    campaign.enabled_form().ok_or(Error::FormNotEnabled {
        campaign_id: campaign.id,
    })
}
