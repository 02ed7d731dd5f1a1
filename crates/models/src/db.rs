use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Open the shared connection pool described by `cfg`.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(max_connections = cfg.max_connections, "database pool ready");
    Ok(db)
}

/// Connect using `DATABASE_URL` and default pool settings; used by tests and tooling.
pub async fn connect_from_env() -> anyhow::Result<DatabaseConnection> {
    let _ = dotenvy::dotenv();
    let mut cfg = DatabaseConfig::default();
    cfg.normalize_from_env();
    cfg.validate()?;
    connect(&cfg).await
}
