use url::Url;

const PAGE_KEY: &str = "page";

/// Query parameters of the current listing URL, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    /// Parse a query string, with or without the leading `?`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self(url.query_pairs().into_owned().collect())
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Raw `page` parameter, if present.
    #[must_use]
    pub fn page(&self) -> Option<&str> {
        self.get(PAGE_KEY)
    }

    /// Same parameters with `page` replaced (or appended).
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        let mut pairs: Vec<(String, String)> = self
            .0
            .iter()
            .filter(|(k, _)| k != PAGE_KEY)
            .cloned()
            .collect();
        let position = self
            .0
            .iter()
            .position(|(k, _)| k == PAGE_KEY)
            .unwrap_or(pairs.len());
        pairs.insert(position, (PAGE_KEY.to_string(), page.to_string()));
        Self(pairs)
    }

    /// Encode back into `key=value&...` form, without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Clamp `requested` into `1..=total_pages`. An empty listing still has page 1.
#[must_use]
pub fn nearest_available_page(requested: u32, total_pages: u32) -> u32 {
    requested.clamp(1, total_pages.max(1))
}
