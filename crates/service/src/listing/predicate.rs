use models::{house, transaction};
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

use super::filter::{BookingFilter, ListingFilter};

/// One WHERE clause over `homes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    TypeRent(String),
    MinBedrooms(i32),
    MinBathrooms(i32),
    MaxPrice(i64),
    Province(i32),
    City(i32),
    /// Case-insensitive substring match against the comma-separated amenities text.
    Amenity(String),
}

impl Predicate {
    pub fn to_expr(&self) -> SimpleExpr {
        match self {
            Predicate::TypeRent(v) => house::Column::TypeRent.eq(v.clone()),
            Predicate::MinBedrooms(v) => house::Column::Bedrooms.gte(*v),
            Predicate::MinBathrooms(v) => house::Column::Bathrooms.gte(*v),
            Predicate::MaxPrice(v) => house::Column::Price.lte(*v),
            Predicate::Province(v) => house::Column::ProvinceId.eq(*v),
            Predicate::City(v) => house::Column::CityId.eq(*v),
            Predicate::Amenity(tag) => Expr::col((house::Entity, house::Column::Amenities))
                .ilike(format!("%{}%", escape_like_wildcards(tag))),
        }
    }
}

/// Predicates for `filter`, in a fixed order: rental unit, bedrooms, bathrooms,
/// price, province, city, then one clause per amenity tag.
pub fn listing_predicates(filter: &ListingFilter) -> Vec<Predicate> {
    let mut preds = Vec::new();
    if let Some(v) = &filter.type_rent {
        preds.push(Predicate::TypeRent(v.clone()));
    }
    if let Some(v) = filter.bedrooms {
        preds.push(Predicate::MinBedrooms(v));
    }
    if let Some(v) = filter.bathrooms {
        preds.push(Predicate::MinBathrooms(v));
    }
    if let Some(v) = filter.price {
        preds.push(Predicate::MaxPrice(v));
    }
    if let Some(v) = filter.province_id {
        preds.push(Predicate::Province(v));
    }
    if let Some(v) = filter.city_id {
        preds.push(Predicate::City(v));
    }
    for tag in &filter.amenities {
        preds.push(Predicate::Amenity(tag.clone()));
    }
    preds
}

/// AND of every listing predicate; `None` when the filter is empty.
///
/// Amenity tags are ANDed: a listing must mention every requested tag.
pub fn listing_condition(filter: &ListingFilter) -> Option<Condition> {
    let preds = listing_predicates(filter);
    if preds.is_empty() {
        return None;
    }
    Some(preds.iter().fold(Condition::all(), |cond, p| cond.add(p.to_expr())))
}

/// OR of one equality per requested payment status; `None` when no status was given.
pub fn booking_status_condition(filter: &BookingFilter) -> Option<Condition> {
    if filter.statuses.is_empty() {
        return None;
    }
    Some(
        filter
            .statuses
            .iter()
            .fold(Condition::any(), |cond, s| cond.add(transaction::Column::PaymentStatus.eq(s.clone()))),
    )
}

fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
