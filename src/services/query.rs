use crate::listing::SearchParams;
use crate::request::RequestDescriptor;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page, page size and free-text filter of a listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl ListQuery {
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Read `page`, `pageSize` and `search` from the listing URL.
    /// Missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_search_params(params: &SearchParams) -> Self {
        let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<u32>().ok());
        Self {
            page: number("page").unwrap_or(1).max(1),
            page_size: number("pageSize").unwrap_or(DEFAULT_PAGE_SIZE).max(1),
            search: params
                .get("search")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        }
    }

    pub(crate) fn apply(&self, request: RequestDescriptor) -> RequestDescriptor {
        let request = request
            .with_query("page", self.page)
            .with_query("pageSize", self.page_size);
        match &self.search {
            Some(search) => request.with_query("search", search),
            None => request,
        }
    }
}
