//! Test context for unified test setup
//!
//! Builds the complete application (in-memory SQLite, temporary upload
//! folder, real services and router) and offers shortcuts for issuing
//! requests against it.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use thinkprint::config::{AdminUser, Settings};
use thinkprint::database::{create_pool, run_migrations, DatabaseConfig, DatabaseService};
use thinkprint::services::{MatchStrategy, ServiceFactory};
use thinkprint::{router, AppState};

use super::test_data::MultipartBody;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password123";
pub const PUBLIC_BASE_URL: &str = "http://gallery.test";

/// Test configuration options
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub strategy: MatchStrategy,
    pub rate_limit: Option<(u32, u32)>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::All,
            rate_limit: None,
        }
    }
}

/// A decoded HTTP response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }

    pub fn error(&self) -> String {
        self.json()["error"].as_str().unwrap_or_default().to_string()
    }
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Create a new test context with all components initialized
    pub async fn new() -> Self {
        Self::new_with_config(TestConfig::default()).await
    }

    /// Create a new test context with custom configuration
    pub async fn new_with_config(config: TestConfig) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = Self::create_test_settings(&config, &temp_dir);

        let pool = create_pool(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let database = DatabaseService::new(pool);
        let services = ServiceFactory::new(&settings, database.clone())
            .await
            .expect("Failed to create services");
        let state = AppState::new(settings, database, services);
        let app = router(state.clone());

        Self { app, state, temp_dir }
    }

    fn create_test_settings(config: &TestConfig, temp_dir: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.auth.secret_key = "integration-test-secret".to_string();
        settings.auth.admin_users = vec![AdminUser {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        }];
        settings.storage.upload_dir = temp_dir
            .path()
            .join("uploads")
            .to_string_lossy()
            .into_owned();
        settings.gallery.public_base_url = PUBLIC_BASE_URL.to_string();
        settings.matching.strategy = config.strategy;

        match config.rate_limit {
            Some((requests_per_minute, burst)) => {
                settings.rate_limit.enabled = true;
                settings.rate_limit.requests_per_minute = requests_per_minute;
                settings.rate_limit.burst = burst;
            }
            None => settings.rate_limit.enabled = false,
        }

        settings.validate().expect("Test settings must be valid");
        settings
    }

    pub fn upload_dir(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("uploads")
    }

    /// Send a request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.expect("Router failed");
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        TestResponse { status, content_type, bytes }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(build_request(Method::GET, uri, token, None)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(build_request(Method::DELETE, uri, token, None)).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(build_request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(build_request(Method::PUT, uri, token, Some(body))).await
    }

    pub async fn post_multipart(&self, uri: &str, form: MultipartBody) -> TestResponse {
        let (content_type, body) = form.finish();
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Log in as the configured admin and return the session token
    pub async fn login(&self) -> String {
        let response = self
            .post_json(
                "/api/login",
                None,
                json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.json());
        response.json()["token"].as_str().expect("token missing").to_string()
    }

    /// Create an event as admin and return its id
    pub async fn create_event(&self, token: &str, name: &str) -> String {
        let response = self.post_json("/api/events", Some(token), json!({ "name": name })).await;
        assert_eq!(response.status, StatusCode::CREATED, "create failed: {:?}", response.json());
        response.json()["id"].as_str().expect("id missing").to_string()
    }
}

fn build_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request")
}
