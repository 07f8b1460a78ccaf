//! Token endpoint exchanges: authorization code and refresh token grants.

use {
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, error},
};

use crate::{
    defaults::{REFRESH_TOKEN_HELP, REGISTER_CLIENT_HELP},
    error::{Error, Result},
    http::read_json,
    types::{OAuthConfig, TokenGrant, TokenResponse},
};

/// Talks to the OAuth token endpoint. Holds no token state.
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    config: OAuthConfig,
    client: Client,
}

impl OAuthFlow {
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Exchange a one-time authorization code for an access/refresh pair.
    pub async fn exchange(&self, code: &Secret<String>) -> Result<TokenGrant> {
        debug!(token_url = %self.config.token_url, "exchanging authorization code");
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code.expose_secret().as_str()),
        ];
        self.post_token(&params, REGISTER_CLIENT_HELP).await
    }

    /// Exchange a stored refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &Secret<String>) -> Result<TokenGrant> {
        debug!(token_url = %self.config.token_url, "refreshing access token");
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ("refresh_token", refresh_token.expose_secret().as_str()),
        ];
        self.post_token(&params, REFRESH_TOKEN_HELP).await
    }

    async fn post_token(&self, params: &[(&str, &str)], hint: &'static str) -> Result<TokenGrant> {
        // Zoho takes the grant as query parameters on a POST.
        let response = self
            .client
            .post(&self.config.token_url)
            .query(params)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "token request failed"))?;

        let body: TokenResponse = read_json(response)
            .await
            .inspect_err(|e| error!(error = %e, "token endpoint returned an error response"))?;

        if let Some(code) = body.error {
            error!(code = %code, hint, "token endpoint rejected the exchange");
            return Err(Error::AuthExchange { code, hint });
        }

        let (Some(access_token), Some(expires_in)) = (body.access_token, body.expires_in) else {
            error!(hint, "token endpoint response is missing access_token or expires_in");
            return Err(Error::AuthExchange {
                code: "missing_access_token".into(),
                hint,
            });
        };

        Ok(TokenGrant {
            access_token: Secret::new(access_token),
            refresh_token: body.refresh_token.map(Secret::new),
            expires_in,
            metadata: body.extra,
        })
    }
}
