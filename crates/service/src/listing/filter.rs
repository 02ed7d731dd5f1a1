use std::collections::HashMap;
use std::str::FromStr;

/// Typed listing filters coerced from query-string parameters.
///
/// Numeric parameters that fail to parse or are not positive are treated as
/// absent. Listing endpoints are intentionally permissive here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub type_rent: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub price: Option<i64>,
    pub province_id: Option<i32>,
    pub city_id: Option<i32>,
    pub amenities: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ListingFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            type_rent: params.get("type_rent").filter(|v| !v.is_empty()).cloned(),
            bedrooms: positive(params, "bedrooms"),
            bathrooms: positive(params, "bathrooms"),
            price: positive(params, "price"),
            province_id: positive(params, "province_id"),
            city_id: positive(params, "city_id"),
            amenities: params.get("amenities").map(|v| split_list(v)).unwrap_or_default(),
            limit: positive(params, "limit"),
            offset: positive(params, "offset"),
        }
    }
}

/// Booking list filters: payment statuses (ORed) plus paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub statuses: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl BookingFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            statuses: params.get("status").map(|v| split_list(v)).unwrap_or_default(),
            limit: positive(params, "limit"),
            offset: positive(params, "offset"),
        }
    }
}

fn positive<T>(params: &HashMap<String, String>, key: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    params
        .get(key)
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}

/// Comma-separated values, each trimmed, empties dropped. `Furnished, Pet Allowed`
/// yields `["Furnished", "Pet Allowed"]`; the leading space is not kept as part of
/// the tag, unlike a raw comma split.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
