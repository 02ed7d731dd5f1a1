use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use configs::ListingConfig;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use common::types::DataResponse;
use models::user::Role;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthService;
use service::media::MediaStore;
use service::user_service;

use crate::errors::ApiError;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Clone)]
pub struct ServerState {
    pub db: Arc<DatabaseConnection>,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub media: Arc<dyn MediaStore>,
    pub listing: ListingConfig,
    pub cookie_secure: bool,
}

/// Caller identity placed in request extensions by [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub created_id: Uuid,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub token: String,
}

#[derive(Serialize)]
pub struct AuthStatus {
    pub user_id: Uuid,
    pub user_role: Role,
    pub user_avatar: String,
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Always emits an expired `token` cookie, whether or not the request carried one.
pub fn clear_session(jar: CookieJar) -> CookieJar {
    let mut expired = Cookie::build((TOKEN_COOKIE, "")).path("/").http_only(true).build();
    expired.make_removal();
    jar.add(expired)
}

#[utoipa::path(post, path = "/api/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Invalid input or username taken")))]
pub async fn register(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<RegisterInput>,
) -> Result<(CookieJar, Json<DataResponse<RegisterOutput>>), ApiError> {
    let session = state.auth.register(input).await?;
    let jar = jar.add(session_cookie(session.token, state.cookie_secure));
    Ok((jar, Json(DataResponse::new(RegisterOutput { created_id: session.user.id }))))
}

#[utoipa::path(post, path = "/api/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in"), (status = 401, description = "Wrong username or password")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<DataResponse<LoginOutput>>), ApiError> {
    let session = state.auth.login(input).await?;
    let jar = jar.add(session_cookie(session.token.clone(), state.cookie_secure));
    Ok((jar, Json(DataResponse::new(LoginOutput { token: session.token }))))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<DataResponse<&'static str>>) {
    (clear_session(jar), Json(DataResponse::new("logged out")))
}

#[utoipa::path(get, path = "/api/auth", tag = "auth", responses((status = 200, description = "Session is valid"), (status = 401, description = "Unauthorized")))]
pub async fn check_auth(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<DataResponse<AuthStatus>>, ApiError> {
    let found = user_service::get_user(&state.db, user.id).await?;
    Ok(Json(DataResponse::new(AuthStatus {
        user_id: found.id,
        user_role: user.role,
        user_avatar: found.avatar,
    })))
}

/// `Authorization: Bearer <token>` first, then the `token` cookie.
fn extract_token(req: &Request) -> Result<Option<String>, ApiError> {
    if let Some(value) = req.headers().get(AUTHORIZATION) {
        let header = value
            .to_str()
            .map_err(|_| ApiError::unauthorized("invalid authorization header"))?;
        return match header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            _ => Err(ApiError::unauthorized("invalid authorization header")),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty()))
}

/// Verify the session token and attach [`CurrentUser`] to the request.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    let Some(token) = extract_token(&req)? else {
        tracing::warn!(%path, "missing bearer token and token cookie");
        return Err(ApiError::unauthorized("unauthorized"));
    };
    let claims = state.auth.verify_token(&token).map_err(|e| {
        tracing::warn!(%path, err = %e, "token validation failed");
        ApiError::from(e)
    })?;
    req.extensions_mut().insert(CurrentUser {
        id: claims.uid,
        username: claims.sub,
        role: claims.role,
    });
    Ok(next.run(req).await)
}

async fn require_role(role: Role, req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.role == role => Ok(next.run(req).await),
        Some(user) => {
            tracing::warn!(user_id = %user.id, required = %role, "role denied");
            Err(ApiError::unauthorized(format!("only {role} can access this resource")))
        }
        None => Err(ApiError::unauthorized("unauthorized")),
    }
}

/// Runs after [`require_auth`]; rejects non-owners.
pub async fn require_owner(req: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Owner, req, next).await
}

/// Runs after [`require_auth`]; rejects non-tenants.
pub async fn require_tenant(req: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Tenant, req, next).await
}
