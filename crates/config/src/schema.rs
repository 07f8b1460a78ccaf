//! Config schema types (Zoho credentials, booking resources, HTTP client).
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_REDIRECT_URI: &str = "https://deluge.zoho.com/delugeauth/callback";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.zoho.com";
pub const DEFAULT_BOOKINGS_URL: &str = "https://www.zohoapis.com/bookings/v1/json";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SayvaiConfig {
    pub zoho: ZohoConfig,
    pub http: HttpConfig,
}

/// Zoho OAuth client registration and Bookings resource identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZohoConfig {
    pub client_id: Option<String>,

    pub client_secret: Option<String>,

    /// One-time authorization code from the Zoho API console. Only consumed
    /// when no credential has been stored yet.
    pub auth_code: Option<String>,

    pub redirect_uri: String,

    /// Accounts server; the token endpoint lives at `/oauth/v2/token`.
    pub accounts_url: String,

    pub bookings_url: String,

    /// Service the availability and booking calls are made against.
    pub service_id: Option<String>,

    /// Staff member the availability and booking calls are made against.
    pub staff_id: Option<String>,

    /// Override for the credential file (defaults to `~/.config/sayvai/zoho_tokens.json`).
    pub token_path: Option<PathBuf>,
}

impl Default for ZohoConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            auth_code: None,
            redirect_uri: DEFAULT_REDIRECT_URI.into(),
            accounts_url: DEFAULT_ACCOUNTS_URL.into(),
            bookings_url: DEFAULT_BOOKINGS_URL.into(),
            service_id: None,
            staff_id: None,
            token_path: None,
        }
    }
}

impl ZohoConfig {
    /// Full URL of the OAuth token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/oauth/v2/token", self.accounts_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_zoho() {
        let cfg = SayvaiConfig::default();
        assert_eq!(cfg.zoho.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(cfg.zoho.bookings_url, DEFAULT_BOOKINGS_URL);
        assert_eq!(cfg.http.timeout_secs, 30);
        assert!(cfg.zoho.client_id.is_none());
    }

    #[test]
    fn token_url_strips_trailing_slash() {
        let cfg = ZohoConfig {
            accounts_url: "https://accounts.zoho.eu/".into(),
            ..Default::default()
        };
        assert_eq!(cfg.token_url(), "https://accounts.zoho.eu/oauth/v2/token");
    }
}
