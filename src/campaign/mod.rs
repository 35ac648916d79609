use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::FormSchema;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: CampaignId,
    pub name: String,
    pub description: Option<String>,
    pub form: Option<CampaignForm>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub modified_at: DateTime<Utc>,
}

impl Campaign {
    pub fn enabled_form(&self) -> Option<&FormSchema> {
        self.form
            .as_ref()
            .filter(|form| form.enabled)
            .map(|form| &form.schema)
    }
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}

/// The landing-page form a campaign collects submissions with.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CampaignForm {
    pub enabled: bool,
    pub schema: FormSchema,
}
