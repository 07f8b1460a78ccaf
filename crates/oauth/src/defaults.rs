use std::time::Duration;

use {
    anyhow::Context,
    sayvai_config::{HttpConfig, ZohoConfig},
    secrecy::Secret,
};

use crate::types::OAuthConfig;

/// Remediation pages logged alongside rejected exchanges.
pub const REGISTER_CLIENT_HELP: &str =
    "https://www.zoho.com/bookings/help/api/v1/registerclient.html";
pub const REFRESH_TOKEN_HELP: &str =
    "https://www.zoho.com/bookings/help/api/v1/refreshaccesstoken.html";

/// Build the OAuth client config from the Zoho section.
///
/// Client id and secret are required; the authorization code is optional
/// because it is only consumed once.
pub fn oauth_config(zoho: &ZohoConfig) -> anyhow::Result<OAuthConfig> {
    let client_id = zoho
        .client_id
        .clone()
        .filter(|v| !v.is_empty())
        .context("missing Zoho client id (set ZOHO_CLIENT_ID or [zoho].client_id)")?;
    let client_secret = zoho
        .client_secret
        .clone()
        .filter(|v| !v.is_empty())
        .context("missing Zoho client secret (set ZOHO_CLIENT_SECRET or [zoho].client_secret)")?;

    Ok(OAuthConfig {
        client_id,
        client_secret: Secret::new(client_secret),
        token_url: zoho.token_url(),
        redirect_uri: zoho.redirect_uri.clone(),
        auth_code: zoho
            .auth_code
            .clone()
            .filter(|v| !v.is_empty())
            .map(Secret::new),
    })
}

/// Shared HTTP client with the configured request timeout.
pub fn http_client(http: &HttpConfig) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()
        .context("failed to build HTTP client")
}
