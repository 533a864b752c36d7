use std::sync::Arc;

use super::search_params::SearchParams;
use super::traits::{Notification, Notifier, PageNavigator};
use super::types::{FetchState, ListingData};

/// What to do with one arrival of listing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Display it.
    Adopt,
    /// The URL asks for a page that no longer exists. Navigate to the page
    /// the backend reported instead of displaying an empty table.
    CorrectPage(u32),
}

/// Decide whether `data` should be displayed for the current URL.
///
/// An empty page is stale when the URL carries a `page` parameter that is
/// not the page the backend answered with. A missing `page` parameter, or
/// one that matches, means the listing really is empty.
#[must_use]
pub fn decide<T>(data: &ListingData<T>, params: &SearchParams) -> Decision {
    match params.page() {
        Some(requested) if data.is_empty() && requested.trim().parse::<u32>() != Ok(data.page) => {
            Decision::CorrectPage(data.page)
        }
        _ => Decision::Adopt,
    }
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Initial,
    Refetch,
}

/// Inputs for one reconciliation pass.
pub struct ListingSources<'a, T> {
    /// Data from the initial page load.
    pub initial_data: Option<&'a Arc<ListingData<T>>>,
    /// Latest result of the client-side refetch.
    pub refetch_data: Option<&'a Arc<ListingData<T>>>,
    pub refetch_state: FetchState,
    pub search_params: &'a SearchParams,
}

/// What the listing should render.
#[derive(Debug)]
pub struct ListingView<T> {
    pub data: Option<Arc<ListingData<T>>>,
    pub is_fetching_list: bool,
}

// Manual Clone: avoid derive adding a `T: Clone` bound.
impl<T> Clone for ListingView<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_fetching_list: self.is_fetching_list,
        }
    }
}

/// Merges the initial load and the refetch of a paginated listing into the
/// one view that is displayed.
///
/// Each source is a "last arrival" cell. An arrival is a new `Arc`:
/// passing the same `Arc` again changes nothing and notifies nothing.
/// When both sources change in the same pass, the initial data is applied
/// first and the refetch second, so the refetch result wins.
pub struct ListingReconciler<T, N, P> {
    notifier: N,
    navigator: P,
    last_initial: Option<Arc<ListingData<T>>>,
    last_refetch: Option<Arc<ListingData<T>>>,
    displayed: Option<Arc<ListingData<T>>>,
}

impl<T, N, P> ListingReconciler<T, N, P>
where
    N: Notifier,
    P: PageNavigator,
{
    #[must_use]
    pub fn new(notifier: N, navigator: P) -> Self {
        Self {
            notifier,
            navigator,
            last_initial: None,
            last_refetch: None,
            displayed: None,
        }
    }

    pub fn reconcile(&mut self, sources: ListingSources<'_, T>) -> ListingView<T> {
        if let Some(data) = arrival(&mut self.last_initial, sources.initial_data) {
            self.apply(Source::Initial, &data, sources.search_params);
        }
        if let Some(data) = arrival(&mut self.last_refetch, sources.refetch_data) {
            self.apply(Source::Refetch, &data, sources.search_params);
        }

        ListingView {
            data: self.displayed.clone(),
            is_fetching_list: sources.refetch_state.is_in_flight(),
        }
    }

    /// Currently displayed data.
    #[must_use]
    pub fn data(&self) -> Option<&Arc<ListingData<T>>> {
        self.displayed.as_ref()
    }

    fn apply(&mut self, source: Source, data: &Arc<ListingData<T>>, params: &SearchParams) {
        match decide(data, params) {
            Decision::CorrectPage(page) => {
                tracing::debug!(
                    ?source,
                    requested = params.page().unwrap_or_default(),
                    page,
                    "Listing page out of range, correcting"
                );
                self.navigator.go_to_page(page);
            }
            Decision::Adopt => self.displayed = Some(Arc::clone(data)),
        }

        if let Some(message) = data.soft_error() {
            self.notifier.error(Notification::new(message));
        }
    }
}

/// Record `incoming` in `cell` and return it, unless it is what the cell
/// already holds.
fn arrival<T>(
    cell: &mut Option<Arc<ListingData<T>>>,
    incoming: Option<&Arc<ListingData<T>>>,
) -> Option<Arc<ListingData<T>>> {
    let incoming = incoming?;
    if cell.as_ref().is_some_and(|last| Arc::ptr_eq(last, incoming)) {
        return None;
    }
    *cell = Some(Arc::clone(incoming));
    Some(Arc::clone(incoming))
}
