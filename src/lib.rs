use actix_web::web::{self, Data, FormConfig, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpServer, ResponseError};
use mongodb::{bson, Client};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod form;
pub mod seed;
pub mod submission;
pub mod typedid;
pub mod violations;

pub use campaign::{CampaignBody, CreateCampaignBody, UpdateCampaignFormBody};
pub use config::Config;
pub use error::Error;
pub use submission::SubmissionBody;

use crate::database::{Database, MongoDatabase};

/// Registers every endpoint along with the extractor error formats.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(FormConfig::default().error_handler(|err, _req| {
        // format form errors with custom format
        Error::InvalidForm(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(form::endpoints::get_field_types)
    .service(form::endpoints::get_field_type)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::update_campaign_form)
    .service(campaign::endpoints::remove_campaign_form)
    .service(campaign::endpoints::get_rendered_campaign_form)
    .service(submission::endpoints::create_submission_in_campaign)
    .service(submission::endpoints::get_submissions_in_campaign)
    .default_service(web::to(|| async { Error::PathNotFound.error_response() }));
}

pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.mongodb_uri);
    let db = Client::with_uri_str(&config.mongodb_uri)
        .await?
        .database(&config.database);

    // ping the database to ensure connection is established
    db.run_command(bson::doc! { "ping": 1 }, None).await?;

    let db = MongoDatabase::new(db);
    if config.seed {
        seed::seed(&db).await?;
    }

    let db: Data<Box<dyn Database>> = Data::new(Box::new(db));

    info!("listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(config.bind)?
    .run()
    .await?;

    Ok(())
}
