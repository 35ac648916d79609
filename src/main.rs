use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use agency_cms::{Config, Error};

#[actix_web::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    agency_cms::run(config).await
}
