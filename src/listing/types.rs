use serde::{Deserialize, Serialize};

use crate::request::{Response, status_fallback_message};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_records: u64,
    pub total_pages: u32,
}

/// One page of a listing, as displayed.
///
/// `soft_error` is set when the transport succeeded but the backend could
/// not produce the page. It is data, not an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(alias = "currentPage")]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_error: Option<String>,
}

impl<T> ListingData<T> {
    #[must_use]
    pub fn new(items: Vec<T>, pagination: Pagination, page: u32) -> Self {
        Self {
            items,
            pagination,
            page,
            soft_error: None,
        }
    }

    /// An empty page carrying a backend failure message.
    #[must_use]
    pub fn failed(page: u32, message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            page,
            soft_error: Some(message.into()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The soft error, ignoring empty strings.
    #[must_use]
    pub fn soft_error(&self) -> Option<&str> {
        self.soft_error.as_deref().filter(|s| !s.is_empty())
    }
}

impl<T: serde::de::DeserializeOwned> ListingData<T> {
    /// Turn a listing response into displayable data.
    ///
    /// A non-success status becomes an empty page for `requested_page` with
    /// the backend's message as soft error. A success body that does not
    /// parse is reported the same way.
    #[must_use]
    pub fn from_response(response: &Response, requested_page: u32) -> Self {
        if !response.is_success() {
            let message = response
                .error_message()
                .unwrap_or_else(|| status_fallback_message(response.status));
            tracing::warn!(status = response.status.as_u16(), error = %message, "Listing request failed");
            return Self::failed(requested_page, message);
        }
        match response.json::<Self>() {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Listing response did not match the expected shape");
                Self::failed(requested_page, format!("Unexpected listing response: {e}"))
            }
        }
    }
}

/// Progress of the client-side refetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Submitting,
}

impl FetchState {
    #[must_use]
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Loading | Self::Submitting)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parses_listing_payload() {
        let data: ListingData<String> = serde_json::from_value(json!({
            "items": ["a", "b"],
            "pagination": { "totalRecords": 12, "totalPages": 2 },
            "currentPage": 2
        }))
        .unwrap();

        assert_eq!(data.items, vec!["a", "b"]);
        assert_eq!(data.pagination, Pagination { total_records: 12, total_pages: 2 });
        assert_eq!(data.page, 2);
        assert_eq!(data.soft_error(), None);
    }

    #[test]
    fn test_empty_soft_error_is_ignored() {
        let mut data = ListingData::<u8>::new(vec![], Pagination::default(), 1);
        data.soft_error = Some(String::new());
        assert_eq!(data.soft_error(), None);
    }

    #[test]
    fn test_from_response_success() {
        let response = Response::new(
            StatusCode::OK,
            json!({ "items": [1, 2, 3], "pagination": { "totalRecords": 3, "totalPages": 1 }, "page": 1 }),
        );
        let data = ListingData::<u32>::from_response(&response, 1);
        assert_eq!(data.items, vec![1, 2, 3]);
        assert_eq!(data.soft_error(), None);
    }

    #[test]
    fn test_from_response_failure_becomes_soft_error() {
        let response = Response::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "Export failed" }),
        );
        let data = ListingData::<u32>::from_response(&response, 4);
        assert!(data.is_empty());
        assert_eq!(data.page, 4);
        assert_eq!(data.soft_error(), Some("Export failed"));
    }

    #[test]
    fn test_from_response_malformed_body() {
        let response = Response::new(StatusCode::OK, json!({ "rows": [] }));
        let data = ListingData::<u32>::from_response(&response, 2);
        assert!(data.is_empty());
        assert!(data.soft_error().unwrap().starts_with("Unexpected listing response"));
    }

    #[test]
    fn test_fetch_state_in_flight() {
        assert!(!FetchState::Idle.is_in_flight());
        assert!(FetchState::Loading.is_in_flight());
        assert!(FetchState::Submitting.is_in_flight());
    }
}
