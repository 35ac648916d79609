use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;
use mongodb::options::FindOptions;

use crate::campaign::CampaignId;
use crate::database::MongoSubmissionStore;
use crate::error::Error;

use super::Submission;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert_submission(&self, submission: &Submission) -> Result<(), Error>;

    /// Newest first.
    async fn fetch_submissions_by_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<Submission>, Error>;
}

#[async_trait]
impl SubmissionStore for MongoSubmissionStore {
    #[tracing::instrument(skip(self))]
    async fn insert_submission(&self, submission: &Submission) -> Result<(), Error> {
        self.insert_one(submission, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_submissions_by_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<Submission>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": -1 })
            .build();
        let submissions: Vec<Submission> = self
            .find(bson::doc! { "campaign_id": campaign_id }, options)
            .await?
            .try_collect()
            .await?;

        Ok(submissions)
    }
}
