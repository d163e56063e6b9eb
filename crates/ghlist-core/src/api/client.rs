//! API client for communicating with the GitHub REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests for the user list and user profiles, and plain requests for
//! avatar images.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, warn};

use super::{ApiError, UserSource};
use crate::codec;
use crate::models::{User, UserProfile};

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the GitHub REST API
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("ghlist/", env!("CARGO_PKG_VERSION"));

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// GitHub caps logins at 39 characters
const MAX_LOGIN_LENGTH: usize = 39;

/// API client for GitHub.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl ApiClient {
    /// Create a new API client against api.github.com
    pub fn new() -> Result<Self, ApiError> {
        Self::with_options(
            DEFAULT_API_BASE_URL,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Create a client with a custom base URL and request timeout
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(GITHUB_ACCEPT));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: impl Into<Arc<str>>) {
        self.token = Some(token.into());
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<Arc<str>>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: Arc::clone(&self.base_url),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Validate that a string looks like a GitHub login before it goes
    /// into a URL path: alphanumerics and single inner hyphens, 1-39 chars.
    fn is_valid_login(s: &str) -> bool {
        if s.is_empty() || s.len() > MAX_LOGIN_LENGTH {
            return false;
        }
        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return false;
        }
        s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_bytes(&self, url: &str, authenticated: bool) -> Result<Vec<u8>, ApiError> {
        let mut request = self.client.get(url);
        if authenticated {
            request = request.headers(self.auth_headers()?);
        }

        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ===== Data Fetching Methods =====

    /// Fetch the default page of users, failing on an undecodable body
    pub async fn get_user_list(&self) -> Result<Vec<User>, ApiError> {
        let url = format!("{}/users", self.base_url);
        let body = self.get_bytes(&url, true).await?;
        Ok(codec::decode(&body)?)
    }

    /// Fetch a single profile, surfacing every failure
    pub async fn get_profile(&self, login: &str) -> Result<UserProfile, ApiError> {
        if !Self::is_valid_login(login) {
            return Err(ApiError::InvalidResponse(format!("Invalid login: {:?}", login)));
        }
        let url = format!("{}/users/{}", self.base_url, login);
        let body = self.get_bytes(&url, true).await?;
        Ok(codec::decode(&body)?)
    }
}

#[async_trait]
impl UserSource for ApiClient {
    async fn fetch_user_list(&self) -> Result<Vec<User>, ApiError> {
        match self.get_user_list().await {
            Ok(users) => {
                debug!(count = users.len(), "Fetched user list");
                Ok(users)
            }
            Err(ApiError::Decode(e)) => {
                warn!(error = %e, "Failed to decode user list, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_profile(&self, login: &str) -> Option<UserProfile> {
        match self.get_profile(login).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(login = %login, error = %e, "Failed to fetch profile");
                None
            }
        }
    }

    async fn fetch_avatar(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        // Avatars live on a CDN host; the API token stays on the API host
        self.get_bytes(url, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const USERS_FIXTURE: &str = include_str!("../../tests/fixtures/users.json");
    const MOJOMBO_FIXTURE: &str = include_str!("../../tests/fixtures/user_mojombo.json");

    type Route = (&'static str, u16, Vec<u8>);

    /// Serve canned responses on a loopback port. Returns the base URL and
    /// the lowercased request heads seen so far.
    async fn serve(routes: Vec<Route>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_server = Arc::clone(&seen);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head).to_lowercase();
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                seen_by_server.lock().unwrap().push(head);

                let (status, body) = routes
                    .iter()
                    .find(|(p, _, _)| p.eq_ignore_ascii_case(&path))
                    .map(|(_, s, b)| (*s, b.clone()))
                    .unwrap_or((404, br#"{"message":"Not Found"}"#.to_vec()));

                let header = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                );
                let _ = socket.write_all(header.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), seen)
    }

    fn client(base_url: &str) -> ApiClient {
        ApiClient::with_options(base_url, Duration::from_secs(5))
            .unwrap()
            .with_token("test-token")
    }

    #[test]
    fn test_is_valid_login() {
        assert!(ApiClient::is_valid_login("mojombo"));
        assert!(ApiClient::is_valid_login("KirinDave"));
        assert!(ApiClient::is_valid_login("some-user-42"));

        assert!(!ApiClient::is_valid_login("")); // empty
        assert!(!ApiClient::is_valid_login("-leading"));
        assert!(!ApiClient::is_valid_login("trailing-"));
        assert!(!ApiClient::is_valid_login("double--hyphen"));
        assert!(!ApiClient::is_valid_login("../users")); // path traversal
        assert!(!ApiClient::is_valid_login(&"a".repeat(40))); // too long
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ApiClient::with_options("https://ghe.example.com/api/v3/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "https://ghe.example.com/api/v3");
        assert!(!api.has_token());
        assert!(api.with_token("t").has_token());
    }

    #[tokio::test]
    async fn test_fetch_user_list_fixture() {
        let (base, seen) = serve(vec![("/users", 200, USERS_FIXTURE.as_bytes().to_vec())]).await;
        let users = client(&base).fetch_user_list().await.unwrap();
        assert_eq!(users.len(), 30);

        let heads = seen.lock().unwrap();
        assert!(heads[0].contains("authorization: bearer test-token"));
        assert!(heads[0].contains("user-agent: ghlist/"));
    }

    #[tokio::test]
    async fn test_fetch_user_list_undecodable_is_empty() {
        let (base, _) = serve(vec![("/users", 200, b"<html>oops</html>".to_vec())]).await;
        let users = client(&base).fetch_user_list().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_user_list_http_failure_is_error() {
        let (base, _) = serve(vec![("/users", 503, b"unavailable".to_vec())]).await;
        let result = client(&base).fetch_user_list().await;
        assert!(matches!(result, Err(ApiError::ServerError(_))));
    }

    #[tokio::test]
    async fn test_fetch_profile_fixture() {
        let (base, _) = serve(vec![("/users/mojombo", 200, MOJOMBO_FIXTURE.as_bytes().to_vec())]).await;
        let profile = client(&base).fetch_profile("mojombo").await.unwrap();
        assert_eq!(profile.followers, 23933);
        assert_eq!(profile.following, 11);
    }

    #[tokio::test]
    async fn test_fetch_profile_failures_are_absent() {
        let (base, seen) = serve(vec![("/users/broken", 200, b"[1, 2".to_vec())]).await;
        let api = client(&base);

        assert!(api.fetch_profile("missing").await.is_none()); // 404
        assert!(api.fetch_profile("broken").await.is_none()); // bad JSON
        assert!(api.fetch_profile("not/a/login").await.is_none()); // never sent

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_avatar_skips_token() {
        let (base, seen) = serve(vec![("/u/1", 200, vec![0xff, 0xd8, 0xff])]).await;
        let bytes = client(&base).fetch_avatar(&format!("{}/u/1", base)).await.unwrap();
        assert_eq!(bytes, vec![0xff, 0xd8, 0xff]);
        assert!(!seen.lock().unwrap()[0].contains("authorization"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(&format!("http://{}", addr)).get_user_list().await;
        assert!(matches!(result, Err(ApiError::NetworkError(_))));
    }
}
