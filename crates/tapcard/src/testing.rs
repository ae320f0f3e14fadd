use std::net::SocketAddr;

use axum::http::HeaderMap;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;

use crate::auth::create_token;
use crate::config::Config;

/// A test application builder for integration testing.
///
/// Spins up a TapCard server on an ephemeral port with an in-memory SQLite
/// database. Identity tokens are minted locally with the test secret.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_profile() {
///     let app = TestApp::new().await;
///     let token = app.token_for("alice", None);
///     let res = app.client.get_with_auth(&app.url("/api/profiles/me"), &token).await;
///     assert_eq!(res.status, 200);
/// }
/// ```
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: TestClient,
    pub db: DatabaseConnection,
    pub config: Config,
}

impl TestApp {
    /// Create a new test app with [`Config::for_tests`].
    pub async fn new() -> Self {
        Self::with_config(Config::for_tests()).await
    }

    /// Create a new test app with a custom config.
    pub async fn with_config(config: Config) -> Self {
        let app = crate::App::with_config(config)
            .await
            .expect("Failed to create test app");

        let router = app.router();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local addr");

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = TestClient::new(addr);

        TestApp {
            addr,
            client,
            db: app.db,
            config: app.config,
        }
    }

    /// Get the base URL for the test server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Mint an identity token for `subject`; the subject doubles as username.
    pub fn token_for(&self, subject: &str, email: Option<&str>) -> String {
        create_token(
            subject,
            Some(subject),
            email,
            &self.config.jwt_secret,
            self.config.jwt_expiry_hours,
        )
        .expect("Failed to create test token")
    }

    /// A token whose email is in the configured admin list.
    pub fn admin_token(&self) -> String {
        let email = self
            .config
            .admin_emails
            .first()
            .cloned()
            .expect("Test config has no admin email");
        self.token_for("admin", Some(&email))
    }
}

/// A simple HTTP test client with helper methods.
#[derive(Clone)]
pub struct TestClient {
    inner: reqwest::Client,
    base_addr: SocketAddr,
}

impl TestClient {
    /// Create a new test client pointing at the given address.
    pub fn new(addr: SocketAddr) -> Self {
        TestClient {
            inner: reqwest::Client::new(),
            base_addr: addr,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, url: &str) -> TestResponse {
        let res = self
            .inner
            .get(url)
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a GET request with an auth token.
    pub async fn get_with_auth(&self, url: &str, token: &str) -> TestResponse {
        let res = self
            .inner
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a GET request carrying the token in the session cookie.
    pub async fn get_with_cookie(&self, url: &str, token: &str) -> TestResponse {
        let res = self
            .inner
            .get(url)
            .header(
                "Cookie",
                format!("{}={}", crate::extractors::SESSION_COOKIE, token),
            )
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post(&self, url: &str, body: &str) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with auth token and JSON body.
    pub async fn post_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(body.to_string())
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a PATCH request with auth token and JSON body.
    pub async fn patch_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        let res = self
            .inner
            .patch(url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(body.to_string())
            .send()
            .await
            .expect("PATCH request failed");
        TestResponse::from_response(res).await
    }

    /// Send a DELETE request with auth token.
    pub async fn delete_with_auth(&self, url: &str, token: &str) -> TestResponse {
        let res = self
            .inner
            .delete(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("DELETE request failed");
        TestResponse::from_response(res).await
    }

    /// Get the base URL.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.base_addr)
    }
}

/// A simplified HTTP response for test assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
    pub headers: HeaderMap,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let mut headers = HeaderMap::new();
        for (name, value) in res.headers() {
            if let (Ok(name), Ok(value)) = (
                axum::http::HeaderName::from_bytes(name.as_str().as_bytes()),
                axum::http::HeaderValue::from_bytes(value.as_bytes()),
            ) {
                headers.append(name, value);
            }
        }
        let body = res.text().await.unwrap_or_default();
        TestResponse {
            status,
            body,
            headers,
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Failed to parse response as JSON")
    }

    /// The `code` of an error body.
    pub fn error_code(&self) -> String {
        self.json()["code"].as_str().unwrap_or_default().to_string()
    }
}
