#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect_from_env;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// A fresh connection for the current test's runtime, or `None` when DB tests
/// are disabled (`SKIP_DB_TESTS`) or `DATABASE_URL` is not set.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    let _ = dotenvy::dotenv();
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }

    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_from_env().await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    Ok(Some(connect_from_env().await?))
}
