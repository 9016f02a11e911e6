//! Fetching the post collection over HTTP

use crate::content::PostSummary;

/// Errors from loading the post collection
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode post collection from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Fetch the JSON post collection once. No retry, no timeout.
pub async fn fetch_posts(url: &str) -> Result<Vec<PostSummary>, FetchError> {
    let response = reqwest::get(url).await.map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    response
        .json::<Vec<PostSummary>>()
        .await
        .map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
}
