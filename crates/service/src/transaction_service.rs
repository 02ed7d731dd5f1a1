use chrono::{DateTime, FixedOffset};
use configs::ListingConfig;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::house::RentUnit;
use models::transaction;
use models::user::Role;
use crate::errors::ServiceError;
use crate::house_service::get_house;
use crate::listing::{booking_list_query, BookingFilter, BookingRow};
use crate::media::{ImageUpload, MediaStore, FOLDER_TRANSACTION};

/// Booking request from a tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub house_id: Uuid,
    pub check_in: DateTime<FixedOffset>,
    pub time_rent: i64,
}

/// Check-out and total price for `time_rent` units of `unit` at `price` per unit.
pub fn quote(unit: RentUnit, price: i64, check_in: DateTime<FixedOffset>, time_rent: i64) -> Result<(DateTime<FixedOffset>, i64), ServiceError> {
    if time_rent <= 0 {
        return Err(ServiceError::Validation("time_rent must be positive".into()));
    }
    let units = u32::try_from(time_rent).map_err(|_| ServiceError::Validation("time_rent too large".into()))?;
    let check_out = unit
        .advance(check_in, units)
        .ok_or_else(|| ServiceError::Validation("check_out out of range".into()))?;
    let total = price
        .checked_mul(time_rent)
        .ok_or_else(|| ServiceError::Validation("total_payment overflows".into()))?;
    Ok((check_out, total))
}

/// Book a listing: computes check-out and total, status starts at `waiting-payment`.
#[instrument(skip(db, input), fields(tenant_id = %tenant_id, house_id = %input.house_id))]
pub async fn create_booking(db: &DatabaseConnection, tenant_id: Uuid, input: NewBooking) -> Result<transaction::Model, ServiceError> {
    let house = get_house(db, input.house_id).await?;
    let unit = RentUnit::parse(&house.type_rent)?;
    let (check_out, total_payment) = quote(unit, house.price, input.check_in, input.time_rent)?;
    let created = transaction::create(db, transaction::NewTransaction {
        tenant_id,
        owner_id: house.owner_id,
        house_id: house.id,
        total_payment,
        check_in: input.check_in,
        check_out,
        time_rent: input.time_rent as u32,
    })
    .await?;
    info!(transaction_id = %created.id, total_payment, "transaction_created");
    Ok(created)
}

/// Bookings visible to `viewer`: a tenant's own, or those on an owner's listings.
#[instrument(skip(db))]
pub async fn list_bookings(
    db: &DatabaseConnection,
    viewer: Uuid,
    role: Role,
    filter: &BookingFilter,
    cfg: ListingConfig,
) -> Result<Vec<BookingRow>, ServiceError> {
    booking_list_query(viewer, role, filter, cfg)
        .into_model::<BookingRow>()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

async fn get_booking(db: &DatabaseConnection, id: Uuid) -> Result<transaction::Model, ServiceError> {
    transaction::find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("transaction"))
}

/// Tenant uploads proof of payment; the booking moves to `waiting-approve`.
#[instrument(skip(db, media, image), fields(tenant_id = %tenant_id, transaction_id = %id))]
pub async fn submit_payment(
    db: &DatabaseConnection,
    media: &dyn MediaStore,
    tenant_id: Uuid,
    id: Uuid,
    image: ImageUpload,
) -> Result<transaction::Model, ServiceError> {
    image.validate()?;
    let existing = get_booking(db, id).await?;
    if existing.tenant_id != tenant_id {
        return Err(ServiceError::Forbidden("transaction belongs to another tenant".into()));
    }
    let url = media.replace(FOLDER_TRANSACTION, &existing.payment_proof, image).await?;
    let updated = transaction::set_payment_proof(db, existing, &url).await?;
    info!("payment_submitted");
    Ok(updated)
}

/// Owner sets the payment status (typically `approved` or `rejected`).
#[instrument(skip(db), fields(owner_id = %owner_id, transaction_id = %id))]
pub async fn update_status(db: &DatabaseConnection, owner_id: Uuid, id: Uuid, status: &str) -> Result<transaction::Model, ServiceError> {
    if status.trim().is_empty() {
        return Err(ServiceError::Validation("status required".into()));
    }
    let existing = get_booking(db, id).await?;
    if existing.owner_id != owner_id {
        return Err(ServiceError::Forbidden("transaction belongs to another owner".into()));
    }
    let updated = transaction::set_status(db, existing, status).await?;
    info!(status = %updated.payment_status, "transaction_status_updated");
    Ok(updated)
}
