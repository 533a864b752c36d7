//! Thin REST wrappers for admin resources, built on
//! [`AuthenticatedHttpClient`](crate::AuthenticatedHttpClient).
//!
//! Listing calls never fail on a backend error: the failure comes back as
//! [`ListingData::soft_error`](crate::listing::ListingData) for the
//! reconciler to show. Transport errors and a failed credential refresh
//! still return `Err`.

mod branding;
mod query;

pub use branding::{Branding, BrandingId, BrandingInput, BrandingService};
pub use query::ListQuery;
