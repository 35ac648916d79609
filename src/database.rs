use async_trait::async_trait;
use mongodb::{Collection, Database as MongoDb};

use crate::campaign::db::CampaignStore;
use crate::campaign::Campaign;
use crate::error::Error;
use crate::submission::db::SubmissionStore;
use crate::submission::Submission;

pub type MongoCampaignStore = Collection<Campaign>;
pub type MongoSubmissionStore = Collection<Submission>;

#[async_trait]
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;

    fn submissions(&self) -> &dyn SubmissionStore;

    async fn drop_database(&self) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: MongoCampaignStore,
    submissions: MongoSubmissionStore,
    db: MongoDb,
}

impl MongoDatabase {
    pub fn new(db: MongoDb) -> MongoDatabase {
        MongoDatabase {
            campaigns: db.collection("campaigns"),
            submissions: db.collection("submissions"),
            db,
        }
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn submissions(&self) -> &dyn SubmissionStore {
        &self.submissions
    }

    async fn drop_database(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        Ok(())
    }
}
