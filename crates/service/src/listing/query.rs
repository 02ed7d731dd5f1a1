use configs::ListingConfig;
use models::{house, transaction, user};
use sea_orm::sea_query::{Alias, Asterisk, Expr};
use sea_orm::{
    entity::prelude::DateTimeWithTimeZone, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use uuid::Uuid;

use models::user::Role;

use super::filter::{BookingFilter, ListingFilter};
use super::predicate::{booking_status_condition, listing_condition};

/// Public listing projection; the owner reference is not exposed.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub featured_image: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub type_rent: String,
    pub price: i64,
    pub province_id: i32,
    pub city_id: i32,
    pub description: String,
    pub amenities: String,
    pub area: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Booking joined with its tenant and listing display fields.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct BookingRow {
    pub id: Uuid,
    pub tenant_fullname: String,
    pub tenant_gender: String,
    pub tenant_phone_number: String,
    pub house_title: String,
    pub house_province_id: i32,
    pub house_city_id: i32,
    pub house_amenities: String,
    pub house_type_rent: String,
    pub payment_status: String,
    pub payment_proof: String,
    pub total_payment: i64,
    pub check_in: DateTimeWithTimeZone,
    pub check_out: DateTimeWithTimeZone,
    pub time_rent: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

const LISTING_COLUMNS: [house::Column; 14] = [
    house::Column::Id,
    house::Column::Title,
    house::Column::FeaturedImage,
    house::Column::Bedrooms,
    house::Column::Bathrooms,
    house::Column::TypeRent,
    house::Column::Price,
    house::Column::ProvinceId,
    house::Column::CityId,
    house::Column::Description,
    house::Column::Amenities,
    house::Column::Area,
    house::Column::CreatedAt,
    house::Column::UpdatedAt,
];

/// Clamp the requested page size to `max_page_size` (0 = unbounded).
pub(crate) fn page_limit(requested: Option<u64>, max_page_size: u64) -> Option<u64> {
    match (requested, max_page_size) {
        (r, 0) => r,
        (None, max) => Some(max),
        (Some(r), max) => Some(r.min(max)),
    }
}

fn paginate<E: EntityTrait>(mut q: Select<E>, limit: Option<u64>, offset: Option<u64>, cfg: ListingConfig) -> Select<E> {
    if let Some(limit) = page_limit(limit.filter(|&l| l > 0), cfg.max_page_size) {
        q = q.limit(limit);
    }
    if let Some(offset) = offset.filter(|&o| o > 0) {
        q = q.offset(offset);
    }
    q
}

/// Listing SELECT: shared condition, newest first, LIMIT/OFFSET only when positive.
pub fn list_query(filter: &ListingFilter, cfg: ListingConfig) -> Select<house::Entity> {
    let mut q = house::Entity::find().select_only().columns(LISTING_COLUMNS);
    if let Some(cond) = listing_condition(filter) {
        q = q.filter(cond);
    }
    let q = q.order_by_desc(house::Column::CreatedAt);
    paginate(q, filter.limit, filter.offset, cfg)
}

/// `COUNT(*)` over `homes` with the same condition as [`list_query`] and no paging.
pub fn count_query(filter: &ListingFilter) -> Select<house::Entity> {
    let mut q = house::Entity::find()
        .select_only()
        .column_as(Expr::col(Asterisk).count(), "count");
    if let Some(cond) = listing_condition(filter) {
        q = q.filter(cond);
    }
    q
}

/// Booking SELECT scoped to the viewer: tenants see their own bookings,
/// owners see bookings on their listings. Statuses are ORed.
pub fn booking_list_query(viewer: Uuid, role: Role, filter: &BookingFilter, cfg: ListingConfig) -> Select<transaction::Entity> {
    let tenant = Alias::new("tenant");
    let home = Alias::new("house");
    let mut q = transaction::Entity::find()
        .select_only()
        .column(transaction::Column::Id)
        .column_as(Expr::col((tenant.clone(), user::Column::Fullname)), "tenant_fullname")
        .column_as(Expr::col((tenant.clone(), user::Column::Gender)), "tenant_gender")
        .column_as(Expr::col((tenant.clone(), user::Column::PhoneNumber)), "tenant_phone_number")
        .column_as(Expr::col((home.clone(), house::Column::Title)), "house_title")
        .column_as(Expr::col((home.clone(), house::Column::ProvinceId)), "house_province_id")
        .column_as(Expr::col((home.clone(), house::Column::CityId)), "house_city_id")
        .column_as(Expr::col((home.clone(), house::Column::Amenities)), "house_amenities")
        .column_as(Expr::col((home.clone(), house::Column::TypeRent)), "house_type_rent")
        .columns([
            transaction::Column::PaymentStatus,
            transaction::Column::PaymentProof,
            transaction::Column::TotalPayment,
            transaction::Column::CheckIn,
            transaction::Column::CheckOut,
            transaction::Column::TimeRent,
            transaction::Column::CreatedAt,
            transaction::Column::UpdatedAt,
        ])
        .join_as(JoinType::InnerJoin, transaction::Relation::Tenant.def(), tenant)
        .join_as(JoinType::InnerJoin, transaction::Relation::House.def(), home);

    q = match role {
        Role::Tenant => q.filter(transaction::Column::TenantId.eq(viewer)),
        Role::Owner => q.filter(transaction::Column::OwnerId.eq(viewer)),
    };
    if let Some(cond) = booking_status_condition(filter) {
        q = q.filter(cond);
    }
    let q = q.order_by_desc(transaction::Column::CreatedAt);
    paginate(q, filter.limit, filter.offset, cfg)
}
