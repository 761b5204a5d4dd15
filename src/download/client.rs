//! HTTP client wrapper for fetching image bodies.
//!
//! This module provides the `HttpClient` struct which issues the GET request,
//! maps transport and status failures to [`FetchError`], and streams the body
//! into memory chunk by chunk.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Response};
use tracing::{debug, instrument};

use super::constants::{DEFAULT_TIMEOUT, MAX_BODY_PREALLOC};
use super::error::FetchError;
use crate::user_agent;

/// HTTP client for fetching images.
///
/// Created once and reused for every URL of a session, taking advantage of
/// connection pooling.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the default 10 second timeout.
    ///
    /// # Errors
    ///
    /// Returns the reqwest build error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client whose requests (connect plus body) are bounded by `timeout`.
    ///
    /// Bodies are kept as sent: no transparent decompression, so the declared
    /// `Content-Length` stays visible to header validation.
    ///
    /// # Errors
    ///
    /// Returns the reqwest build error if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(user_agent::default_fetch_user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET request and returns the response once a 2xx status arrives.
    ///
    /// The body is not read; callers inspect headers first.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Timeout`], [`FetchError::Connect`] or
    /// [`FetchError::Request`] for transport failures and
    /// [`FetchError::HttpStatus`] for non-2xx responses.
    #[instrument(level = "debug", skip(self))]
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "non-success status");
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Streams a response body into memory, chunk by chunk.
///
/// # Errors
///
/// Returns [`FetchError::Timeout`] if the request deadline passes mid-body,
/// otherwise [`FetchError::Request`].
pub async fn read_body(response: Response, url: &str) -> Result<Vec<u8>, FetchError> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .map_or(0, |len| len.min(MAX_BODY_PREALLOC));
    let mut body = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::from_reqwest(url, e))?;
        body.extend_from_slice(&chunk);
    }

    debug!(bytes = body.len(), "body received");
    Ok(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    #[tokio::test]
    async fn test_get_returns_response_for_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cat.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "image/jpeg")
                    .set_body_bytes(b"jpeg bytes".to_vec()),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/cat.jpg", mock_server.uri());
        let response = client.get(&url).await.unwrap();
        let body = read_body(response, &url).await.unwrap();
        assert_eq!(body, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_get_keeps_declared_length_of_encoded_body() {
        let mock_server = MockServer::start().await;
        let encoded = vec![0x1f_u8; 25];
        Mock::given(method("GET"))
            .and(path("/packed.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "image/png")
                    .insert_header("Content-Encoding", "gzip")
                    .set_body_bytes(encoded.clone()),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/packed.png", mock_server.uri());
        let response = client.get(&url).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok()),
            Some("25")
        );
        let body = read_body(response, &url).await.unwrap();
        assert_eq!(body, encoded);
    }

    #[tokio::test]
    async fn test_get_maps_404_to_http_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/missing.jpg", mock_server.uri());
        match client.get(&url).await {
            Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_times_out_on_slow_server() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"late".to_vec())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_secs(1)).unwrap();
        let url = format!("{}/slow.jpg", mock_server.uri());
        match client.get(&url).await {
            Err(FetchError::Timeout { .. }) => {}
            other => panic!("Expected Timeout error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_sends_identifying_user_agent() {
        struct ToolUaMatcher;

        impl Match for ToolUaMatcher {
            fn matches(&self, request: &Request) -> bool {
                request
                    .headers
                    .get("User-Agent")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|ua| {
                        ua.starts_with("imgfetch/") && ua.contains(env!("CARGO_PKG_VERSION"))
                    })
            }
        }

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua.png"))
            .and(ToolUaMatcher)
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/ua.png", mock_server.uri());
        assert!(client.get(&url).await.is_ok());
    }
}
