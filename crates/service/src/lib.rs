//! Service layer providing the business operations behind the HTTP API.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - `listing` holds the filtered list/count query builder shared by listings and bookings.
//! - `seed` loads development users and listings.

pub mod errors;
pub mod auth;
pub mod listing;
pub mod media;
pub mod user_service;
pub mod house_service;
pub mod transaction_service;
pub mod seed;
#[cfg(test)]
pub mod test_support;
