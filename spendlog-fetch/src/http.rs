//! HTTP client for the REST backend.
//!
//! Wraps `reqwest` with:
//! - A base URL that endpoint segments are appended to
//! - Bearer-token authorization on every request
//! - Request/response tracing
//! - Status-code mapping into [`FetchError`]

use reqwest::{Client, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{FetchError, HttpError};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Spendlog.
const USER_AGENT: &str = concat!("Spendlog/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in error messages.
const MAX_ERROR_BODY: usize = 200;

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpClient {
    /// Creates a client for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse or the client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client for `base_url` with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse or the client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner,
            base_url: normalize_base(base_url)?,
            token: None,
        })
    }

    /// Sets the bearer token sent with each request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if the base URL cannot take a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, HttpError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| HttpError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.inner.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Performs a GET request and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status or a bad body.
    #[instrument(skip(self, query), fields(path = %segments.join("/")))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(segments)?;
        debug!("GET request");

        let response = self
            .request(reqwest::Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(HttpError::from)?;
        decode(check_status(response).await?).await
    }

    /// Performs a POST request with a JSON body and decodes the reply.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status or a bad body.
    #[instrument(skip(self, body), fields(path = %segments.join("/")))]
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, FetchError> {
        let url = self.endpoint(segments)?;
        debug!("POST request with JSON");

        let response = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(HttpError::from)?;
        decode(check_status(response).await?).await
    }

    /// Performs a PUT request with a JSON body and decodes the reply.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status or a bad body.
    #[instrument(skip(self, body), fields(path = %segments.join("/")))]
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, FetchError> {
        let url = self.endpoint(segments)?;
        debug!("PUT request with JSON");

        let response = self
            .request(reqwest::Method::PUT, url)
            .json(body)
            .send()
            .await
            .map_err(HttpError::from)?;
        decode(check_status(response).await?).await
    }

    /// Performs a DELETE request, discarding the body.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status.
    #[instrument(skip(self), fields(path = %segments.join("/")))]
    pub async fn delete(&self, segments: &[&str]) -> Result<(), FetchError> {
        let url = self.endpoint(segments)?;
        debug!("DELETE request");

        let response = self
            .request(reqwest::Method::DELETE, url)
            .send()
            .await
            .map_err(HttpError::from)?;
        check_status(response).await?;
        Ok(())
    }
}

/// Parses a base URL and checks that it is http(s).
fn normalize_base(base_url: &str) -> Result<Url, HttpError> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(HttpError::InvalidUrl(format!("not an http(s) base URL: {base_url}")));
    }
    Ok(url)
}

// ============================================================================
// Response Handling
// ============================================================================

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

/// Maps a non-success status to an error.
pub fn status_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> FetchError {
    let mut detail = status.to_string();
    let body = body.trim();
    if !body.is_empty() {
        let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
        detail = format!("{detail}: {snippet}");
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::AuthenticationFailed(detail),
        StatusCode::NOT_FOUND => FetchError::NotFound(detail),
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { retry_after },
        _ => FetchError::InvalidResponse(detail),
    }
}

async fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    debug!(status = %status, "Response received");
    if status.is_success() {
        return Ok(response);
    }
    let retry_after = response.retry_after_secs();
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, retry_after, &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let bytes = response.bytes().await.map_err(HttpError::from)?;
    Ok(serde_json::from_slice(&bytes)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = HttpClient::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            client.endpoint(&["expenses"]).unwrap().as_str(),
            "http://localhost:5000/api/expenses"
        );
        assert_eq!(
            client.endpoint(&["expenses", "abc"]).unwrap().as_str(),
            "http://localhost:5000/api/expenses/abc"
        );
    }

    #[test]
    fn test_base_with_trailing_slash() {
        let client = HttpClient::new("https://example.com/api/").unwrap();
        assert_eq!(
            client.endpoint(&["expenses", "statistics"]).unwrap().as_str(),
            "https://example.com/api/expenses/statistics"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let client = HttpClient::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            client.endpoint(&["expenses", "a/b c"]).unwrap().as_str(),
            "http://localhost:5000/api/expenses/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_urls() {
        assert!(HttpClient::new("not a url").is_err());
        assert!(HttpClient::new("ftp://example.com/api").is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, None, ""),
            FetchError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, None, ""),
            FetchError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, None, ""),
            FetchError::NotFound(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, Some(30), ""),
            FetchError::RateLimited { retry_after: Some(30) }
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, None, "boom"),
            FetchError::InvalidResponse(ref msg) if msg.contains("boom")
        ));
    }

    #[test]
    fn test_error_body_is_truncated() {
        let body = "x".repeat(1000);
        let FetchError::InvalidResponse(msg) = status_error(StatusCode::BAD_GATEWAY, None, &body)
        else {
            panic!("expected invalid response");
        };
        assert!(msg.len() < 300);
    }
}
