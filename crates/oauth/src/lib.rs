//! Zoho OAuth credential lifecycle: token endpoint exchanges, on-disk
//! credential storage and refresh-on-expiry.

pub mod clock;
mod config_dir;
pub mod defaults;
pub mod error;
pub mod flow;
pub mod http;
pub mod manager;
pub mod storage;
pub mod types;

pub use {
    clock::{Clock, ManualClock, SystemClock},
    defaults::{http_client, oauth_config},
    error::{Error, Result},
    flow::OAuthFlow,
    manager::{TokenManager, TokenState},
    storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore},
    types::{Credential, OAuthConfig, TokenGrant, serialize_secret},
};
