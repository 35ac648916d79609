use actix_web::web::{Data, Json, Path};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::{self, CampaignId};
use crate::database::Database;
use crate::error::Error;
use crate::form::SubmissionPayload;

use super::{manager, Submission, SubmissionId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionBody {
    pub id: SubmissionId,
    pub campaign_id: CampaignId,
    pub payload: SubmissionPayload,
    pub created_at: DateTime<Utc>,
}

impl SubmissionBody {
    pub fn render(submission: Submission) -> SubmissionBody {
        SubmissionBody {
            id: submission.id,
            campaign_id: submission.campaign_id,
            payload: submission.payload,
            created_at: submission.created_at,
        }
    }
}

#[post("/campaigns/{campaign_id}/submissions")]
#[tracing::instrument(skip(db))]
pub async fn create_submission_in_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<SubmissionPayload>,
) -> Result<Json<SubmissionBody>, Error> {
    let campaign_id = params.into_inner();
    let payload = body.into_inner();

    let campaign = campaign::manager::get_campaign_by_id(&***db, campaign_id).await?;
    let submission = manager::create_submission(&***db, &campaign, payload).await?;

    Ok(Json(SubmissionBody::render(submission)))
}

#[get("/campaigns/{campaign_id}/submissions")]
#[tracing::instrument(skip(db))]
pub async fn get_submissions_in_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<Vec<SubmissionBody>>, Error> {
    let campaign_id = params.into_inner();

    let campaign = campaign::manager::get_campaign_by_id(&***db, campaign_id).await?;
    let submissions = manager::get_submissions(&***db, &campaign).await?;

    let body = submissions.into_iter().map(SubmissionBody::render).collect();

    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use super::*;
    use crate::campaign::{Campaign, CampaignForm};
    use crate::database::test::MockDatabase;
    use crate::form::registry::create_default;
    use crate::form::{FieldType, FieldValue, FormSchema};

    fn campaign_with_form(campaign_id: CampaignId) -> Campaign {
        let mut email = create_default(FieldType::Email, 1, &FormSchema::new());
        email.name = "contact_email".into();
        email.required = true;
        let mut services = create_default(FieldType::Checkbox, 2, &FormSchema::new());
        services.name = "services".into();
        services.options = vec!["Branding".into(), "Web Design".into()];

        let now = Utc::now();
        Campaign {
            id: campaign_id,
            name: "Spring Launch".into(),
            description: None,
            form: Some(CampaignForm {
                enabled: true,
                schema: FormSchema::from(vec![email, services]),
            }),
            created_at: now,
            modified_at: now,
        }
    }

    fn payload(email: &str, services: &[&str]) -> SubmissionPayload {
        let mut payload = SubmissionPayload::new();
        payload.insert("contact_email".into(), FieldValue::Text(email.into()));
        payload.insert(
            "services".into(),
            FieldValue::Choices(services.iter().map(|s| s.to_string()).collect()),
        );
        payload
    }

    #[actix_web::test]
    async fn stores_a_valid_submission() {
        let campaign_id = CampaignId::new();
        let stored = Arc::new(Mutex::new(vec![]));
        let stored_clone = Arc::clone(&stored);
        let mut db = MockDatabase::new();
        db.campaigns.on_fetch_campaign_by_id =
            Box::new(move |campaign_id| Ok(Some(campaign_with_form(campaign_id))));
        db.submissions.on_insert_submission = Box::new(move |submission| {
            stored_clone.lock().unwrap().push(submission.clone());
            Ok(())
        });
        let app = test::init_service(
            App::new()
                .app_data(Data::new(Box::new(db) as Box<dyn Database>))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/campaigns/{}/submissions", campaign_id))
            .set_json(&payload("hello@studio.example", &["Web Design"]))
            .to_request();
        let body: SubmissionBody = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.campaign_id, campaign_id);
        assert_eq!(body.payload, payload("hello@studio.example", &["Web Design"]));
        let stored = stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, body.id);
    }

    #[actix_web::test]
    async fn rejects_a_submission_that_breaks_the_form_rules() {
        let campaign_id = CampaignId::new();
        let mut db = MockDatabase::new();
        db.campaigns.on_fetch_campaign_by_id =
            Box::new(move |campaign_id| Ok(Some(campaign_with_form(campaign_id))));
        let app = test::init_service(
            App::new()
                .app_data(Data::new(Box::new(db) as Box<dyn Database>))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/campaigns/{}/submissions", campaign_id))
            .set_json(&payload("", &["SEO"]))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error_code"], "E4221001");
        let violations = &body["error_meta"]["violations"];
        assert_eq!(violations[0]["type"], "MISSING-REQUIRED-FIELD");
        assert_eq!(violations[0]["field_name"], "contact_email");
        assert_eq!(violations[1]["type"], "UNDECLARED-OPTION");
        assert_eq!(violations[1]["value"], "SEO");
    }
}
