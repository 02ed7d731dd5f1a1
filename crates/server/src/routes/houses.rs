use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use common::types::DataResponse;
use models::house::{self, HouseFields};
use service::house_service;
use service::listing::{ListingFilter, ListingRow};

use crate::errors::ApiError;
use crate::multipart::FormData;
use super::auth::{CurrentUser, ServerState};

fn house_fields(form: &FormData) -> Result<HouseFields, ApiError> {
    Ok(HouseFields {
        title: form.text("title")?,
        bedrooms: form.number("bedrooms")?,
        bathrooms: form.number("bathrooms")?,
        type_rent: form.text("type_rent")?,
        price: form.number("price")?,
        province_id: form.number("province_id")?,
        city_id: form.number("city_id")?,
        amenities: form.optional_text("amenities"),
        description: form.optional_text("description"),
        area: form.number("area")?,
    })
}

/// Filtered listing page. Unparseable or non-positive filters are ignored.
#[utoipa::path(get, path = "/api/houses", tag = "houses", params(crate::openapi::ListingQuery), responses((status = 200, description = "Listing page")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DataResponse<Vec<ListingRow>>>, ApiError> {
    let filter = ListingFilter::from_params(&params);
    let rows = house_service::list_houses(&state.db, &filter, state.listing).await?;
    Ok(Json(DataResponse::new(rows)))
}

#[utoipa::path(get, path = "/api/houses/count", tag = "houses", params(crate::openapi::ListingQuery), responses((status = 200, description = "Number of matching listings")))]
pub async fn count(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DataResponse<i64>>, ApiError> {
    let filter = ListingFilter::from_params(&params);
    let total = house_service::count_houses(&state.db, &filter).await?;
    Ok(Json(DataResponse::new(total)))
}

#[utoipa::path(get, path = "/api/houses/{id}", tag = "houses", params(("id" = Uuid, Path, description = "Listing id")), responses((status = 200, description = "Listing detail"), (status = 404, description = "Not found")))]
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<house::Model>>, ApiError> {
    let found = house_service::get_house(&state.db, id).await?;
    Ok(Json(DataResponse::new(found)))
}

pub async fn mine(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
) -> Result<Json<DataResponse<Vec<house::Model>>>, ApiError> {
    let rows = house_service::list_owner_houses(&state.db, me.id).await?;
    Ok(Json(DataResponse::new(rows)))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<DataResponse<house::Model>>, ApiError> {
    let mut form = FormData::read(multipart).await?;
    let fields = house_fields(&form)?;
    let image = form.required_file("featured_image")?;
    let created = house_service::create_house(&state.db, state.media.as_ref(), me.id, &fields, image).await?;
    Ok(Json(DataResponse::new(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<DataResponse<house::Model>>, ApiError> {
    let mut form = FormData::read(multipart).await?;
    let fields = house_fields(&form)?;
    let image = form.file("featured_image");
    let updated = house_service::update_house(&state.db, state.media.as_ref(), me.id, id, &fields, image).await?;
    Ok(Json(DataResponse::new(updated)))
}

#[utoipa::path(delete, path = "/api/houses/{id}", tag = "houses", params(("id" = Uuid, Path, description = "Listing id")), responses((status = 200, description = "Deleted"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(me): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<Uuid>>, ApiError> {
    house_service::delete_house(&state.db, state.media.as_ref(), me.id, id).await?;
    Ok(Json(DataResponse::new(id)))
}
