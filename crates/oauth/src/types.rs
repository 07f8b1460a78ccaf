use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize, Serializer},
};

/// Serialize a `Secret<String>` by exposing its inner value.
pub fn serialize_secret<S: Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// OAuth client registration used against the token endpoint.
#[derive(Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub token_url: String,
    pub redirect_uri: String,
    /// One-time authorization code for the initial exchange, if configured.
    pub auth_code: Option<Secret<String>>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_code", &self.auth_code.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// The persisted access/refresh token pair.
///
/// `expires_at` is a unix timestamp in seconds. Any other field the token
/// endpoint returned (`api_domain`, `token_type`, `scope`...) is kept in
/// `metadata` and written back unchanged.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    #[serde(serialize_with = "serialize_secret")]
    pub access_token: Secret<String>,
    #[serde(serialize_with = "serialize_secret")]
    pub refresh_token: Secret<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Credential {
    /// Unset expiry counts as expired, so an uninitialized credential is
    /// never treated as authorized.
    pub fn is_expired_at(&self, now: u64) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => now > expires_at,
        }
    }

    /// Seconds of validity left at `now`, zero once expired or unknown.
    pub fn remaining_secs(&self, now: u64) -> u64 {
        self.expires_at
            .map(|expires_at| expires_at.saturating_sub(now))
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Raw token endpoint payload. Zoho reports rejected codes as a 200 with an
/// `error` field, so every field is optional here and validated by the flow.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A successful token endpoint answer.
pub struct TokenGrant {
    pub access_token: Secret<String>,
    /// Present on the authorization-code exchange only.
    pub refresh_token: Option<Secret<String>>,
    pub expires_in: u64,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
