use std::sync::Arc;

use dotenvy::dotenv;
use migration::MigratorTrait;
use tracing::{error, info};

async fn run(cfg: configs::AppConfig) -> anyhow::Result<service::seed::SeedReport> {
    let db = models::db::connect(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    let auth = service::auth::service::AuthConfig::from_app(&cfg.auth);
    Ok(service::seed::seed(Arc::new(db), auth).await?)
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "seed", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.server.log_json);

    match run(cfg).await {
        Ok(report) => {
            info!(service = "seed", event = "stop", skipped = report.skipped, houses = report.houses, "seeding finished");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "seed", event = "seed_failed", error = %e, "seeding failed");
            std::process::ExitCode::FAILURE
        }
    }
}
