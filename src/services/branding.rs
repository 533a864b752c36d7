use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use super::query::ListQuery;
use crate::client::{AuthenticatedHttpClient, CredentialStore, TokenRefresher};
use crate::error::Error;
use crate::listing::ListingData;
use crate::request::RequestDescriptor;
use crate::transport::Transport;

const BRANDINGS_PATH: &str = "brandings";

/// Backend identifier of a branding record (opaque string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct BrandingId(pub String);

/// A branding record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Branding {
    pub id: BrandingId,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<time::OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<time::OffsetDateTime>,
}

/// Fields accepted by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
}

impl BrandingInput {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_primary_color(mut self, color: impl Into<String>) -> Self {
        self.primary_color = Some(color.into());
        self
    }
}

/// CRUD calls for `/brandings`.
pub struct BrandingService<T, S, R> {
    client: AuthenticatedHttpClient<T, S, R>,
}

impl<T, S, R> BrandingService<T, S, R>
where
    T: Transport,
    S: CredentialStore,
    R: TokenRefresher,
{
    #[must_use]
    pub fn new(client: AuthenticatedHttpClient<T, S, R>) -> Self {
        Self { client }
    }

    /// Fetch one page of brandings.
    ///
    /// # Errors
    ///
    /// Only transport failures and a failed credential refresh. A backend
    /// error is returned as [`ListingData::soft_error`].
    pub async fn list(&self, query: &ListQuery) -> Result<ListingData<Branding>, Error> {
        let response = self
            .client
            .request(query.apply(RequestDescriptor::get(BRANDINGS_PATH)))
            .await?;
        Ok(ListingData::from_response(&response, query.page))
    }

    /// # Errors
    ///
    /// [`Error::Api`] if the backend rejects the call, plus the errors of
    /// [`AuthenticatedHttpClient::request`].
    pub async fn get(&self, id: &BrandingId) -> Result<Branding, Error> {
        self.client
            .get(&record_path(id))
            .await?
            .error_for_status()?
            .json()
    }

    /// # Errors
    ///
    /// [`Error::Api`] if the backend rejects the call, plus the errors of
    /// [`AuthenticatedHttpClient::request`].
    pub async fn create(&self, input: &BrandingInput) -> Result<Branding, Error> {
        let branding: Branding = self
            .client
            .post(BRANDINGS_PATH, input)
            .await?
            .error_for_status()?
            .json()?;
        tracing::info!(id = %branding.id, "Branding created");
        Ok(branding)
    }

    /// # Errors
    ///
    /// [`Error::Api`] if the backend rejects the call, plus the errors of
    /// [`AuthenticatedHttpClient::request`].
    pub async fn update(&self, id: &BrandingId, input: &BrandingInput) -> Result<Branding, Error> {
        let branding: Branding = self
            .client
            .put(&record_path(id), input)
            .await?
            .error_for_status()?
            .json()?;
        tracing::info!(id = %branding.id, "Branding updated");
        Ok(branding)
    }

    /// # Errors
    ///
    /// [`Error::Api`] if the backend rejects the call, plus the errors of
    /// [`AuthenticatedHttpClient::request`].
    pub async fn delete(&self, id: &BrandingId) -> Result<(), Error> {
        self.client
            .delete(&record_path(id))
            .await?
            .error_for_status()?;
        tracing::info!(id = %id, "Branding deleted");
        Ok(())
    }
}

fn record_path(id: &BrandingId) -> String {
    format!("{BRANDINGS_PATH}/{}", urlencoding::encode(&id.0))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_record_path_encodes_id() {
        assert_eq!(record_path(&BrandingId::from("abc".to_string())), "brandings/abc");
        assert_eq!(record_path(&BrandingId("a/b c".into())), "brandings/a%2Fb%20c");
    }

    #[test]
    fn test_branding_parses_timestamps() {
        let branding: Branding = serde_json::from_value(json!({
            "id": "b-1",
            "name": "Acme",
            "primaryColor": "#ff0000",
            "createdAt": "2025-01-02T03:04:05Z"
        }))
        .unwrap();

        assert_eq!(branding.id.to_string(), "b-1");
        assert_eq!(branding.primary_color.as_deref(), Some("#ff0000"));
        assert_eq!(branding.logo_url, None);
        assert_eq!(
            branding.created_at,
            Some(time::macros::datetime!(2025-01-02 03:04:05 UTC))
        );
        assert_eq!(branding.updated_at, None);
    }

    #[test]
    fn test_input_skips_unset_fields() {
        let input = BrandingInput::new("Acme").with_primary_color("#00ff00");
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "name": "Acme", "primaryColor": "#00ff00" })
        );
    }
}
