use chrono::Utc;
use tracing::info;

use crate::campaign::manager::expect_enabled_form;
use crate::campaign::Campaign;
use crate::database::Database;
use crate::error::Error;
use crate::form::validate::validate_submission;
use crate::form::SubmissionPayload;

use super::{Submission, SubmissionId};

/// Validates `payload` against the campaign's enabled form and stores it.
#[tracing::instrument(skip(db))]
pub async fn create_submission(
    db: &dyn Database,
    campaign: &Campaign,
    payload: SubmissionPayload,
) -> Result<Submission, Error> {
    let schema = expect_enabled_form(campaign)?;

    let violations = validate_submission(schema, &payload);
    if !violations.is_empty() {
        info!(count = violations.len(), "rejecting submission");
        return Err(Error::SubmissionViolatesRules { violations });
    }

    let submission = Submission {
        id: SubmissionId::new(),
        campaign_id: campaign.id,
        payload,
        created_at: Utc::now(),
    };

    db.submissions().insert_submission(&submission).await?;

    Ok(submission)
}

#[tracing::instrument(skip(db))]
pub async fn get_submissions(
    db: &dyn Database,
    campaign: &Campaign,
) -> Result<Vec<Submission>, Error> {
    let submissions = db
        .submissions()
        .fetch_submissions_by_campaign(campaign.id)
        .await?;

    Ok(submissions)
}
