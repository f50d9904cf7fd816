#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, header::COOKIE};
use axum_test::{TestResponse, TestServer};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use signup_form::api::middleware::rate_limit::RateLimit;
use signup_form::application::services::SignupService;
use signup_form::domain::entities::SignupRecord;
use signup_form::domain::repositories::{SignupRepository, StoreError};
use signup_form::infrastructure::mail::Notifier;
use signup_form::infrastructure::persistence::FileSignupRepository;
use signup_form::routes::router;
use signup_form::state::AppState;
use signup_form::web::session::SessionSigner;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const TEST_SITE: &str = "Test Meetup";

/// Notifier that records recipients and returns a fixed result.
pub struct RecordingNotifier {
    succeed: bool,
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: &str) -> bool {
        self.sent.lock().unwrap().push(recipient.to_string());
        self.succeed
    }

    fn is_configured(&self) -> bool {
        self.succeed
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl SignupRepository for BrokenStore {
    async fn contains(&self, _email: &str) -> Result<bool, StoreError> {
        Err(StoreError::Remote("503 Service Unavailable: quota".to_string()))
    }

    async fn append(&self, _record: &SignupRecord) -> Result<(), StoreError> {
        Err(StoreError::Remote("503 Service Unavailable: quota".to_string()))
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Remote("503 Service Unavailable: quota".to_string()))
    }
}

/// A file-backed store in a temporary directory.
pub struct TempStore {
    pub dir: TempDir,
    pub repository: Arc<FileSignupRepository>,
}

impl TempStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(FileSignupRepository::new(dir.path().join("emails.txt")));
        Self { dir, repository }
    }

    pub fn path(&self) -> &Path {
        self.repository.path()
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(self.path()).unwrap_or_default()
    }

    pub fn seed(&self, lines: &str) {
        std::fs::write(self.path(), lines).unwrap();
    }
}

pub fn create_test_state(
    repository: Arc<dyn SignupRepository>,
    notifier: Arc<dyn Notifier>,
) -> AppState {
    let signup_service = Arc::new(SignupService::new(repository, notifier));
    let session = Arc::new(SessionSigner::new(TEST_SECRET));

    AppState::new(signup_service, session, TEST_SITE)
}

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Full application router without rate limiting.
pub fn create_test_server(
    repository: Arc<dyn SignupRepository>,
    notifier: Arc<dyn Notifier>,
) -> TestServer {
    create_limited_test_server(repository, notifier, RateLimit::Disabled)
}

/// Full application router with the given rate limiting mode.
pub fn create_limited_test_server(
    repository: Arc<dyn SignupRepository>,
    notifier: Arc<dyn Notifier>,
    limit: RateLimit,
) -> TestServer {
    let state = create_test_state(repository, notifier);
    let app = router(state, limit, &static_dir());

    TestServer::new(app).unwrap()
}

/// Returns the `name=value` pair of a `Set-Cookie` header on the response.
pub fn set_cookie(response: &TestResponse, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
        .map(|value| value.split(';').next().unwrap_or_default().to_string())
}

pub fn cookie_header(pairs: &[&str]) -> (HeaderName, HeaderValue) {
    (COOKIE, HeaderValue::from_str(&pairs.join("; ")).unwrap())
}

/// Extracts the hidden CSRF field from a rendered form.
pub fn form_token(html: &str) -> String {
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker).expect("form has a csrf_token field") + marker.len();
    let end = html[start..].find('"').unwrap() + start;
    html[start..end].to_string()
}

/// Loads the form and returns the CSRF cookie pair and form token.
pub async fn fetch_form(server: &TestServer) -> (String, String) {
    let response = server.get("/").await;
    response.assert_status_ok();

    let cookie = set_cookie(&response, "csrf_token").expect("csrf cookie issued");
    let token = form_token(&response.text());
    (cookie, token)
}

/// Submits `email` with a valid CSRF token and returns the flash cookie pair.
pub async fn submit(server: &TestServer, email: &str) -> TestResponse {
    let (cookie, token) = fetch_form(server).await;
    let (name, value) = cookie_header(&[&cookie]);

    server
        .post("/")
        .add_header(name, value)
        .form(&[("email", email), ("csrf_token", token.as_str())])
        .await
}

/// Follows a submission by rendering the page with the returned flash cookie.
pub async fn render_with_flash(server: &TestServer, submission: &TestResponse) -> String {
    let flash = set_cookie(submission, "flash").expect("flash cookie set");
    let (name, value) = cookie_header(&[&flash]);

    server.get("/").add_header(name, value).await.text()
}
