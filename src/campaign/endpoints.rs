use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::form::render::{render, FormState, RenderedForm};
use crate::form::FormSchema;

use super::{manager, Campaign, CampaignForm, CampaignId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateCampaignBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateCampaignFormBody {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub schema: FormSchema,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    pub id: CampaignId,
    pub name: String,
    pub description: Option<String>,
    pub form: Option<CampaignForm>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            name: campaign.name,
            description: campaign.description,
            form: campaign.form,
            created_at: campaign.created_at,
            modified_at: campaign.modified_at,
        }
    }
}

#[post("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<CreateCampaignBody>,
) -> Result<Json<CampaignBody>, Error> {
    let body = body.into_inner();

    let campaign = manager::create_campaign(&***db, body.name, body.description).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: Data<Box<dyn Database>>) -> Result<Json<Vec<CampaignBody>>, Error> {
    let campaigns = manager::get_campaigns(&***db).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[put("/campaigns/{campaign_id}/form")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign_form(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<UpdateCampaignFormBody>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;
    let campaign =
        manager::update_campaign_form(&***db, campaign, body.enabled, body.schema).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[delete("/campaigns/{campaign_id}/form")]
#[tracing::instrument(skip(db))]
pub async fn remove_campaign_form(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;
    let campaign = manager::remove_campaign_form(&***db, campaign).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

/// The public rendering of a campaign's form, with every control empty.
#[get("/campaigns/{campaign_id}/form")]
#[tracing::instrument(skip(db))]
pub async fn get_rendered_campaign_form(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<RenderedForm>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;
    let schema = manager::expect_enabled_form(&campaign)?;

    Ok(Json(render(schema, &FormState::new())))
}
