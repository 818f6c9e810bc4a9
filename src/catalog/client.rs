use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use super::model::{Book, BookPage};

/// Maximum response body size. A listing page is a few hundred KB at most;
/// anything beyond this is a misbehaving server.
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Errors from the catalog API.
///
/// Network/transport failures and body-decoding failures both collapse to a
/// logged fetch error at the UI layer; there is no retry and no user-facing
/// message, so the distinction only matters for diagnostics.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Response body was not the expected JSON shape
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// HTTP client for the Gutendex book catalog.
///
/// Cheap to clone (the inner `reqwest::Client` is an Arc), so fetch tasks
/// can own their own copy.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CatalogClient {
    /// Create a client over a shared `reqwest::Client`.
    ///
    /// `base_url` is the API root (e.g. `https://gutendex.com`); a trailing
    /// slash is tolerated.
    pub fn new(http: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Fetch one page of the book listing: `GET /books/?page={n}`.
    ///
    /// Pages are 1-based. Pages past the end of the catalog yield an empty
    /// result list (the API's behavior, passed through unchanged).
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<Book>, CatalogError> {
        let url = format!("{}/books/?page={}", self.base_url, page);
        let page: BookPage = self.get_json(&url).await?;
        Ok(page.results)
    }

    /// Fetch the default, unparameterized listing page: `GET /books`.
    ///
    /// Used only to populate the cache for the wishlist view when no catalog
    /// page has been fetched yet.
    pub async fn fetch_default_page(&self) -> Result<Vec<Book>, CatalogError> {
        let url = format!("{}/books", self.base_url);
        let page: BookPage = self.get_json(&url).await?;
        Ok(page.results)
    }

    /// Fetch a single book record: `GET /books/{id}`.
    pub async fn fetch_book(&self, id: i64) -> Result<Book, CatalogError> {
        let url = format!("{}/books/{}", self.base_url, id);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        tracing::debug!(url = %url, "Fetching from catalog API");

        let response = tokio::time::timeout(self.timeout, self.http.get(url).send())
            .await
            .map_err(|_| CatalogError::Timeout)?
            .map_err(CatalogError::Network)?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_BODY_SIZE).await?;
        serde_json::from_slice(&bytes).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

/// Stream the response body with a hard size cap to bound memory use.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CatalogError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(CatalogError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
