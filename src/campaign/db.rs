use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson;

use crate::database::MongoCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignForm, CampaignId};

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(&self, campaign_id: CampaignId)
        -> Result<Option<Campaign>, Error>;

    async fn update_campaign_form(
        &self,
        campaign: Campaign,
        form: Option<CampaignForm>,
    ) -> Result<Campaign, Error>;
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.insert_one(campaign, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let campaigns: Vec<Campaign> = self.find(bson::doc! {}, None).await?.try_collect().await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = self
            .find_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign_form(
        &self,
        mut campaign: Campaign,
        form: Option<CampaignForm>,
    ) -> Result<Campaign, Error> {
        let now = Utc::now();
        let old_modified_at = bson::DateTime::from_chrono(campaign.modified_at);
        let new_modified_at = bson::DateTime::from_chrono(now);
        let new_form = bson::to_bson(&form)?;

        let result = self
            .update_one(
                bson::doc! { "_id": campaign.id, "modified_at": old_modified_at },
                bson::doc! { "$set": { "form": new_form, "modified_at": new_modified_at } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::ConcurrentModificationDetected);
        }

        campaign.modified_at = now;
        campaign.form = form;

        Ok(campaign)
    }
}
