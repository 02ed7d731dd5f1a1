//! Filtered list queries shared by the listing and booking endpoints.
//!
//! Raw query-string parameters go through [`filter`] (typed, lenient coercion),
//! become an ordered predicate list in [`predicate`], and are rendered into
//! list and count statements by [`query`]. List and count share one condition
//! builder, so a filter can never narrow one without the other.

pub mod filter;
pub mod predicate;
pub mod query;

pub use filter::{BookingFilter, ListingFilter};
pub use predicate::{booking_status_condition, listing_condition, listing_predicates, Predicate};
pub use query::{booking_list_query, count_query, list_query, BookingRow, ListingRow};
