//! Response handling shared by the token endpoint and the resource API.

use {
    reqwest::{Response, StatusCode},
    serde::de::DeserializeOwned,
};

use crate::error::{Error, Result};

/// Accept exactly `200 OK` and decode the body. Any other status becomes
/// [`Error::Http`] with the body kept for diagnostics.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::OK {
        return Err(Error::Http { status, body });
    }

    Ok(serde_json::from_str(&body)?)
}
