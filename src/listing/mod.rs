//! Paginated listing state for admin tables.
//!
//! A listing gets its data from two places: the initial page load and a
//! later client-side refetch (after a filter change, a delete, ...).
//! [`ListingReconciler`] keeps whichever arrived last on screen, redirects
//! to a valid page when the current one has emptied out from under the
//! user, and turns backend soft errors into [`Notification`]s.

mod reconciler;
mod search_params;
mod traits;
mod types;

pub use reconciler::{Decision, ListingReconciler, ListingSources, ListingView, decide};
pub use search_params::{SearchParams, nearest_available_page};
pub use traits::{Notification, Notifier, PageNavigator};
pub use types::{FetchState, ListingData, Pagination};
