//! Credential lifecycle: authorize once, refresh on expiry, hand out valid
//! access tokens.

use std::sync::Arc;

use {
    sayvai_config::SayvaiConfig,
    secrecy::Secret,
    tokio::sync::Mutex,
    tracing::{debug, error, info, warn},
};

use crate::{
    clock::{Clock, SystemClock},
    defaults::{REGISTER_CLIENT_HELP, http_client, oauth_config},
    error::{Error, Result},
    flow::OAuthFlow,
    storage::{CredentialStore, FileCredentialStore},
    types::Credential,
};

/// Where the stored credential stands right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Nothing stored; an authorization code exchange is required.
    Unauthenticated,
    AuthenticatedValid,
    /// Stored but past `expires_at` (or with no known expiry).
    AuthenticatedExpired,
}

/// Owns the token endpoint flow and the credential store.
///
/// Refreshes issued through one manager are serialized so a burst of callers
/// holding an expired token triggers a single refresh. Managers in different
/// processes sharing one file are last-writer-wins.
pub struct TokenManager {
    flow: OAuthFlow,
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    refresh_lock: Mutex<()>,
}

impl TokenManager {
    pub fn new(flow: OAuthFlow, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            flow,
            store,
            clock: Arc::new(SystemClock),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// File-backed manager built from the loaded configuration.
    pub fn from_config(config: &SayvaiConfig) -> anyhow::Result<Self> {
        let flow = OAuthFlow::with_client(oauth_config(&config.zoho)?, http_client(&config.http)?);
        let store = match &config.zoho.token_path {
            Some(path) => FileCredentialStore::with_path(path.clone()),
            None => FileCredentialStore::new(),
        };
        Ok(Self::new(flow, Arc::new(store)))
    }

    /// The stored credential, if any.
    pub fn credential(&self) -> Option<Credential> {
        self.store.load()
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn state(&self) -> TokenState {
        match self.store.load() {
            None => TokenState::Unauthenticated,
            Some(c) if c.is_expired_at(self.clock.now()) => TokenState::AuthenticatedExpired,
            Some(_) => TokenState::AuthenticatedValid,
        }
    }

    /// True when there is no credential or the stored one has expired.
    pub fn is_expired(&self) -> bool {
        self.state() != TokenState::AuthenticatedValid
    }

    /// Return the stored credential, or exchange the configured authorization
    /// code for one when nothing is stored yet.
    pub async fn get_auth_tokens(&self) -> Result<Credential> {
        if let Some(credential) = self.store.load() {
            return Ok(credential);
        }
        let Some(code) = self.flow.config().auth_code.clone() else {
            warn!(hint = REGISTER_CLIENT_HELP, "no stored credential and no authorization code configured");
            return Err(Error::NotAuthenticated);
        };
        self.authorize(&code).await
    }

    /// Exchange `code` and replace whatever is stored. Nothing is persisted
    /// when the exchange fails.
    pub async fn authorize(&self, code: &Secret<String>) -> Result<Credential> {
        let grant = self.flow.exchange(code).await?;

        let Some(refresh_token) = grant.refresh_token else {
            error!(hint = REGISTER_CLIENT_HELP, "authorization exchange returned no refresh token");
            return Err(Error::AuthExchange {
                code: "missing_refresh_token".into(),
                hint: REGISTER_CLIENT_HELP,
            });
        };

        let expires_at = self.clock.now().saturating_add(grant.expires_in);
        let credential = Credential {
            access_token: grant.access_token,
            refresh_token,
            expires_at: Some(expires_at),
            metadata: grant.metadata,
        };
        self.persist(&credential)?;

        info!(expires_at, "authorization code exchanged, credential stored");
        Ok(credential)
    }

    /// Trade the stored refresh token for a new access token. Only
    /// `access_token` and `expires_at` change.
    pub async fn refresh(&self) -> Result<Credential> {
        let _guard = self.refresh_lock.lock().await;
        let current = self.load_or_unauthenticated()?;
        self.refresh_locked(current).await
    }

    /// A token that is not known to be expired at call time, refreshing first
    /// when needed.
    pub async fn get_valid_access_token(&self) -> Result<Secret<String>> {
        let current = self.load_or_unauthenticated()?;
        if !current.is_expired_at(self.clock.now()) {
            return Ok(current.access_token);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited.
        let current = self.load_or_unauthenticated()?;
        if !current.is_expired_at(self.clock.now()) {
            debug!("access token already refreshed by a concurrent caller");
            return Ok(current.access_token);
        }
        Ok(self.refresh_locked(current).await?.access_token)
    }

    /// Drop the stored credential.
    pub fn logout(&self) -> Result<()> {
        self.store.clear().map_err(|e| {
            error!(error = %e, "failed to clear stored credential");
            Error::Storage(e)
        })
    }

    async fn refresh_locked(&self, current: Credential) -> Result<Credential> {
        let grant = self.flow.refresh(&current.refresh_token).await?;

        let expires_at = self.clock.now().saturating_add(grant.expires_in);
        let updated = Credential {
            access_token: grant.access_token,
            expires_at: Some(expires_at),
            ..current
        };
        self.persist(&updated)?;

        info!(expires_at, "access token refreshed");
        Ok(updated)
    }

    fn load_or_unauthenticated(&self) -> Result<Credential> {
        self.store.load().ok_or_else(|| {
            warn!("no stored credential, authorization required");
            Error::NotAuthenticated
        })
    }

    fn persist(&self, credential: &Credential) -> Result<()> {
        self.store.save(credential).map_err(|e| {
            error!(error = %e, "failed to persist credential");
            Error::Storage(e)
        })
    }
}
