use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use common::types::DataResponse;
use models::transaction;
use service::listing::{BookingFilter, BookingRow};
use service::transaction_service::{self, NewBooking};

use crate::errors::ApiError;
use crate::multipart::FormData;
use super::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[utoipa::path(post, path = "/api/transactions", tag = "transactions", request_body = crate::openapi::BookingRequest, responses((status = 200, description = "Booking created"), (status = 404, description = "Listing not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Json(input): Json<NewBooking>,
) -> Result<Json<DataResponse<transaction::Model>>, ApiError> {
    let created = transaction_service::create_booking(&state.db, me.id, input).await?;
    Ok(Json(DataResponse::new(created)))
}

/// Tenants see their own bookings; owners see bookings on their listings.
#[utoipa::path(get, path = "/api/transactions", tag = "transactions", params(crate::openapi::BookingQuery), responses((status = 200, description = "Booking page"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DataResponse<Vec<BookingRow>>>, ApiError> {
    let filter = BookingFilter::from_params(&params);
    let rows = transaction_service::list_bookings(&state.db, me.id, me.role, &filter, state.listing).await?;
    Ok(Json(DataResponse::new(rows)))
}

pub async fn pay(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<DataResponse<transaction::Model>>, ApiError> {
    let mut form = FormData::read(multipart).await?;
    let image = form.required_file("payment_proof")?;
    let updated = transaction_service::submit_payment(&state.db, state.media.as_ref(), me.id, id, image).await?;
    Ok(Json(DataResponse::new(updated)))
}

pub async fn set_status(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<DataResponse<transaction::Model>>, ApiError> {
    let status = query.status.unwrap_or_default();
    let updated = transaction_service::update_status(&state.db, me.id, id, &status).await?;
    Ok(Json(DataResponse::new(updated)))
}
