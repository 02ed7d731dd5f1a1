//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::warn;

/// Warn when the static frontend directory is missing; the API still serves without it.
pub async fn ensure_env(frontend_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; static assets may 404");
    }
    Ok(())
}
