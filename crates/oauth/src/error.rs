use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the token lifecycle and the authenticated request
/// wrapper. Every variant reaches the caller; none is folded into success.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No stored credential. Requires a fresh authorization code.
    #[error("not authenticated: no stored credential, run `sayvai auth login`")]
    NotAuthenticated,

    /// The token endpoint answered 200 but carried an `error` code.
    #[error("token exchange rejected: {code} (see {hint})")]
    AuthExchange { code: String, hint: &'static str },

    /// Non-200 response from the token endpoint or the resource API.
    #[error("unexpected HTTP status {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Connection, DNS or timeout failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 200 response whose body is not the expected JSON.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The credential store could not persist or clear the record.
    #[error("credential store failure: {0}")]
    Storage(#[source] anyhow::Error),
}

impl Error {
    /// HTTP status for [`Error::Http`], if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
