use std::{net::SocketAddr, sync::Arc};

use configs::{AppConfig, MediaConfig};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::media::{CloudinaryMediaStore, InMemoryMediaStore, MediaStore};

use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Cloudinary when credentials are present, otherwise an in-process store.
pub fn build_media(cfg: &MediaConfig) -> Arc<dyn MediaStore> {
    if cfg.is_configured() {
        Arc::new(CloudinaryMediaStore::new(cfg.clone()))
    } else {
        warn!("media credentials missing; uploads are kept in memory only");
        Arc::new(InMemoryMediaStore::default())
    }
}

/// Connect the pool and assemble shared handler state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = Arc::new(models::db::connect(&cfg.database).await?);
    let repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    Ok(ServerState {
        db,
        auth: Arc::new(AuthService::new(repo, AuthConfig::from_app(&cfg.auth))),
        media: build_media(&cfg.media),
        listing: cfg.listing,
        cookie_secure: cfg.auth.cookie_secure,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.server.frontend_dir).await?;

    let state = build_state(&cfg).await?;
    let app = routes::build_router(state, build_cors(), &cfg.server.frontend_dir);

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
