use axum::{extract::{Multipart, State}, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use common::types::DataResponse;
use models::user;
use service::auth::domain::ChangePasswordInput;
use service::user_service;

use crate::errors::ApiError;
use crate::multipart::FormData;
use super::auth::{clear_session, CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct ProfileInput {
    pub fullname: String,
    pub email: String,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
}

impl From<ProfileInput> for user::Profile {
    fn from(p: ProfileInput) -> Self {
        user::Profile {
            fullname: p.fullname,
            email: p.email,
            gender: p.gender,
            phone_number: p.phone_number,
            address: p.address,
        }
    }
}

#[derive(Serialize)]
pub struct AvatarOutput {
    pub avatar: String,
}

#[utoipa::path(get, path = "/api/user", tag = "user", responses((status = 200, description = "Caller profile"), (status = 401, description = "Unauthorized")))]
pub async fn get_profile(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
) -> Result<Json<DataResponse<user::Model>>, ApiError> {
    let found = user_service::get_user(&state.db, me.id).await?;
    Ok(Json(DataResponse::new(found)))
}

#[utoipa::path(patch, path = "/api/user", tag = "user", request_body = crate::openapi::ProfileRequest, responses((status = 200, description = "Updated profile"), (status = 400, description = "Invalid input")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<DataResponse<user::Model>>, ApiError> {
    let updated = user_service::update_profile(&state.db, me.id, &input.into()).await?;
    Ok(Json(DataResponse::new(updated)))
}

/// The session cookie is dropped so the client logs in again with the new password.
#[utoipa::path(patch, path = "/api/user/password", tag = "user", request_body = crate::openapi::ChangePasswordRequest, responses((status = 200, description = "Password changed"), (status = 400, description = "Wrong password or too short")))]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    jar: CookieJar,
    Json(input): Json<ChangePasswordInput>,
) -> Result<(CookieJar, Json<DataResponse<&'static str>>), ApiError> {
    state.auth.change_password(me.id, input).await?;
    Ok((clear_session(jar), Json(DataResponse::new("password changed"))))
}

pub async fn update_avatar(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<DataResponse<AvatarOutput>>, ApiError> {
    let mut form = FormData::read(multipart).await?;
    let image = form.required_file("avatar")?;
    let avatar = user_service::update_avatar(&state.db, state.media.as_ref(), me.id, image).await?;
    Ok(Json(DataResponse::new(AvatarOutput { avatar })))
}
