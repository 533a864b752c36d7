use derive_more::{From, Into};
use serde::{Deserialize, Serialize};

/// Bearer access token attached to outbound requests.
///
/// `Debug` never prints the secret. Use [`secret()`](AccessToken::secret)
/// when the raw value is actually needed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

/// Long-lived token exchanged for a new credential pair.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RefreshToken([redacted])")
    }
}

/// Access + refresh token, as issued at login and by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl CredentialPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken::new(access_token),
            refresh_token: RefreshToken::new(refresh_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        let pair = CredentialPair::new("access-secret", "refresh-secret");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("access-secret"));
        assert!(!debug.contains("refresh-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn credential_pair_uses_camel_case() {
        let pair = CredentialPair::new("a", "r");
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json, serde_json::json!({ "accessToken": "a", "refreshToken": "r" }));
    }

    #[test]
    fn credential_pair_parses_refresh_response() {
        let pair: CredentialPair =
            serde_json::from_str(r#"{"accessToken":"new-a","refreshToken":"new-r"}"#).unwrap();
        assert_eq!(pair.access_token.secret(), "new-a");
        assert_eq!(pair.refresh_token.secret(), "new-r");
    }

    #[test]
    fn tokens_convert_from_strings() {
        let token = AccessToken::from("abc".to_string());
        let raw: String = token.clone().into();
        assert_eq!(raw, "abc");
        assert_eq!(token.secret(), "abc");
    }
}
