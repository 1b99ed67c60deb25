//! Errors encountered during API requests or reported by the remote server.
use anyhow::Result;
use reqwest::Response;
use serde::de::DeserializeOwned;

/// The server returned an empty API response.
#[derive(Debug, thiserror::Error)]
#[error("the server returned an empty API response")]
pub struct EmptyResponse;

/// Invalid API response received.
#[derive(Debug, thiserror::Error)]
#[error("invalid API response received: {response}")]
pub struct InvalidResponse {
    pub response: String,
}

/// The server responded with a non-success status code.
#[derive(Debug, thiserror::Error)]
#[error("the server responded with status {status}: {response}")]
pub struct RequestRejected {
    /// Response body, as text, returned with the status.
    pub response: String,

    /// HTTP status code returned by the server.
    pub status: u16,
}

/// Decode the body of an HTTP response and correctly handle errors in the process.
pub async fn inspect<T>(response: Response) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let code = response.status();
    let text = response.text().await?;

    if !code.is_success() {
        anyhow::bail!(RequestRejected {
            response: text,
            status: code.as_u16(),
        });
    }

    // On success decode the payload, if any, into the requested type.
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<T>(&text)
        .map_err(|error| {
            let decode = InvalidResponse { response: text };
            anyhow::anyhow!(error).context(decode)
        })
        .map(Some)
}
