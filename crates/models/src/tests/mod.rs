
/// CRUD operations tests for users, listings and bookings
pub mod crud_tests;

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// `None` when DB tests are disabled (`SKIP_DB_TESTS`) or no `DATABASE_URL` is configured.
pub(crate) async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    let _ = dotenvy::dotenv();
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let db = crate::db::connect_from_env().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}
