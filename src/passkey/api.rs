//! HTTP helpers for the passkey backend with consistent timeouts and error
//! handling. Every request goes to the fixed API base path under the configured
//! server URL and carries the session cookie, if one was provided. The session
//! value is only ever exposed to build the header.

use super::{APP_USER_AGENT, error::PasskeyError};
use reqwest::{
    Client, Method, RequestBuilder, Response,
    header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Path of the passkey API below the server URL.
pub const API_BASE_PATH: &str = "/apis/api.passkey.halo.run/v1alpha1";
/// Default request timeout applied to all backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub server_url: String,
    pub session: Option<SecretString>,
    pub timeout: Duration,
}

impl ApiConfig {
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            session: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for the passkey backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client for the given server.
    ///
    /// # Errors
    /// Returns `PasskeyError::Config` if the URL is not an http(s) URL, the session
    /// value is not a valid header value, or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, PasskeyError> {
        let base_url = Url::parse(config.server_url.trim())
            .map_err(|err| PasskeyError::Config(format!("Invalid server URL: {err}")))?;

        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(PasskeyError::Config(format!(
                    "Unsupported URL scheme: {scheme}"
                )))
            }
        }

        let mut headers = HeaderMap::new();
        if let Some(session) = &config.session {
            let mut value = HeaderValue::from_str(session.expose_secret())
                .map_err(|_| PasskeyError::Config("Invalid session cookie value".to_string()))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|err| PasskeyError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    /// Builds the URL of an API resource; each segment is percent-encoded.
    ///
    /// # Errors
    /// Returns `PasskeyError::Config` if the server URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, PasskeyError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| PasskeyError::Config("Server URL cannot be a base".to_string()))?;
            path.pop_if_empty();
            path.extend(API_BASE_PATH.split('/').filter(|s| !s.is_empty()));
            path.extend(segments);
        }
        Ok(url)
    }

    /// Fetches JSON from an API resource.
    ///
    /// # Errors
    /// Returns a transport, HTTP, or parse error.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, PasskeyError> {
        let response = self.send(self.request(Method::GET, segments)?).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns a serialization, transport, HTTP, or parse error.
    #[instrument(skip(self, body))]
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, PasskeyError> {
        let request = self.json_request(Method::POST, segments, body)?;
        let response = self.send(request).await?;
        handle_json_response(response).await
    }

    /// Puts JSON and ignores the response body.
    ///
    /// # Errors
    /// Returns a serialization, transport, or HTTP error.
    #[instrument(skip(self, body))]
    pub async fn put_json<B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), PasskeyError> {
        let request = self.json_request(Method::PUT, segments, body)?;
        let response = self.send(request).await?;
        handle_empty_response(response).await
    }

    /// Deletes an API resource and ignores the response body.
    ///
    /// # Errors
    /// Returns a transport or HTTP error.
    #[instrument(skip(self))]
    pub async fn delete(&self, segments: &[&str]) -> Result<(), PasskeyError> {
        let response = self.send(self.request(Method::DELETE, segments)?).await?;
        handle_empty_response(response).await
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, PasskeyError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "backend request");
        Ok(self.client.request(method, url))
    }

    fn json_request<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<RequestBuilder, PasskeyError> {
        let payload = serde_json::to_vec(body).map_err(|err| {
            PasskeyError::Serialization(format!("Failed to encode request: {err}"))
        })?;
        Ok(self
            .request(method, segments)?
            .header(CONTENT_TYPE, "application/json")
            .body(payload))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, PasskeyError> {
        request.send().await.map_err(map_request_error)
    }
}

/// Maps reqwest failures into timeout or network errors.
fn map_request_error(err: reqwest::Error) -> PasskeyError {
    if err.is_timeout() {
        PasskeyError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        PasskeyError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, PasskeyError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| PasskeyError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

async fn handle_empty_response(response: Response) -> Result<(), PasskeyError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

/// Builds an HTTP error, keeping the backend's `message` field when the body is
/// a structured error.
async fn http_error(response: Response) -> PasskeyError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = backend_message(&body);
    debug!(status, ?message, "backend returned an error");
    PasskeyError::Http {
        status,
        message,
        body: sanitize_body(&body),
    }
}

fn backend_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Trims and truncates HTTP error bodies.
fn sanitize_body(body: &str) -> String {
    body.trim().chars().take(MAX_ERROR_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn endpoint_joins_base_path_and_encodes_segments() {
        let client = ApiClient::new(&ApiConfig::new("https://blog.example/")).unwrap();
        let url = client.endpoint(&["credentials", "a b/c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://blog.example/apis/api.passkey.halo.run/v1alpha1/credentials/a%20b%2Fc"
        );

        let client = ApiClient::new(&ApiConfig::new("https://blog.example/sub")).unwrap();
        let url = client.endpoint(&["registration", "options"]).unwrap();
        assert_eq!(
            url.path(),
            "/sub/apis/api.passkey.halo.run/v1alpha1/registration/options"
        );
    }

    #[test]
    fn new_rejects_unsupported_scheme() {
        let result = ApiClient::new(&ApiConfig::new("ftp://blog.example"));
        assert!(matches!(result, Err(PasskeyError::Config(_))));
        let result = ApiClient::new(&ApiConfig::new("not a url"));
        assert!(matches!(result, Err(PasskeyError::Config(_))));
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("  oops \n"), "oops");
        assert_eq!(sanitize_body(&"x".repeat(500)).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn backend_message_only_from_json_objects() {
        assert_eq!(
            backend_message(r#"{"message":"nope"}"#),
            Some("nope".to_string())
        );
        assert_eq!(backend_message("<html>oops</html>"), None);
        assert_eq!(backend_message(r#"{"error":"nope"}"#), None);
    }

    #[tokio::test]
    async fn post_json_sends_session_cookie_and_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apis/api.passkey.halo.run/v1alpha1/authentication/options"))
            .and(header("cookie", "SESSION=abc"))
            .and(body_json(json!({ "origin": "https://blog.example" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let mut config = ApiConfig::new(server.uri());
        config.session = Some(SecretString::from("SESSION=abc".to_string()));
        let client = ApiClient::new(&config)?;
        let value: Value = client
            .post_json(
                &["authentication", "options"],
                &json!({ "origin": "https://blog.example" }),
            )
            .await?;
        assert_eq!(value, json!({ "ok": true }));
        Ok(())
    }

    #[tokio::test]
    async fn structured_error_message_is_extracted() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/apis/api.passkey.halo.run/v1alpha1/credentials/missing"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "message": "Credential not found" })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::new(server.uri()))?;
        let err = client.delete(&["credentials", "missing"]).await.unwrap_err();
        match err {
            PasskeyError::Http {
                status, message, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Credential not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn slow_backend_maps_to_timeout() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apis/api.passkey.halo.run/v1alpha1/credentials"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "credentials": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let mut config = ApiConfig::new(server.uri());
        config.timeout = Duration::from_millis(100);
        let client = ApiClient::new(&config)?;
        let result: Result<Value, PasskeyError> = client.get_json(&["credentials"]).await;
        assert!(matches!(result, Err(PasskeyError::Timeout(_))));
        Ok(())
    }
}
