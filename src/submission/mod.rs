use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::form::SubmissionPayload;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type SubmissionId = TypedId<Submission>;

/// A validated payload collected by a campaign's form.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Submission {
    #[serde(rename = "_id")]
    pub id: SubmissionId,
    pub campaign_id: CampaignId,
    pub payload: SubmissionPayload,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl TypedIdMarker for Submission {
    fn tag() -> &'static str {
        "SUB"
    }
}
