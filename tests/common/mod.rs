#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use axum::{body::Body, http::Request, Router};
use schedule_api::cli::client::ApiClient;
use schedule_api::cli::token_store::MemoryTokenStore;
use schedule_api::database::manager;
use schedule_api::{AppConfig, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::{Mutex, MutexGuard};
use url::Url;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const UNREACHABLE_DB: &str = "postgres://nobody@127.0.0.1:1/nowhere";

/// Tests sharing the real database run one at a time
static DB_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub fn test_config(database_url: &str, upload_dir: &Path) -> AppConfig {
    let upload_dir = upload_dir.to_string_lossy().to_string();
    AppConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "DATABASE_URL" => Some(database_url.to_string()),
        "DATABASE_CONNECTION_TIMEOUT" => Some("1".to_string()),
        "UPLOAD_DIR" => Some(upload_dir.clone()),
        _ => None,
    })
    .expect("test configuration should parse")
}

/// Router over a pool that never reaches a database. Good for anything that
/// is rejected before a query runs.
pub struct OfflineApp {
    pub router: Router,
    pub state: AppState,
    _uploads: TempDir,
}

pub fn offline_app() -> OfflineApp {
    let uploads = tempfile::tempdir().expect("temp upload dir");
    let config = test_config(UNREACHABLE_DB, uploads.path());
    let pool = manager::connect_lazy(&config.database).expect("lazy pool");
    let state = AppState::new(config, pool);

    OfflineApp {
        router: schedule_api::app(state.clone()),
        state,
        _uploads: uploads,
    }
}

impl OfflineApp {
    pub fn token_for(&self, user_id: i64, email: &str) -> String {
        self.state.jwt.issue(user_id, email).expect("token")
    }
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

/// App served in-process on a free port, backed by `TEST_DATABASE_URL`
pub struct TestServer {
    pub base_url: Url,
    pub state: AppState,
    uploads: TempDir,
    _guard: MutexGuard<'static, ()>,
}

impl TestServer {
    /// `None` (with a notice) when no test database is configured
    pub async fn start() -> Result<Option<Self>> {
        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return Ok(None);
        };

        let guard = DB_LOCK.get_or_init(|| Mutex::new(())).lock().await;

        let uploads = tempfile::tempdir()?;
        let config = test_config(&database_url, uploads.path());
        let pool = manager::connect(&config.database).await?;
        manager::migrate(&pool).await?;
        sqlx::query("TRUNCATE comments, likes, todos, goals, users RESTART IDENTITY CASCADE")
            .execute(&pool)
            .await?;

        let state = AppState::new(config, pool);
        state.uploads.ensure_dir().await?;

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let router = schedule_api::app(state.clone());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("test server stopped: {}", e);
            }
        });

        Ok(Some(Self {
            base_url: Url::parse(&format!("http://127.0.0.1:{}", port))?,
            state,
            uploads,
            _guard: guard,
        }))
    }

    pub fn upload_dir(&self) -> &Path {
        self.uploads.path()
    }

    /// Fresh client with its own in-memory session
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone(), Arc::new(MemoryTokenStore::new()))
    }

    /// Sign up and log in a user; returns the logged-in client and user id
    pub async fn user(&self, name: &str, email: &str) -> Result<(ApiClient, i64)> {
        let client = self.client();
        let user_id = client.signup(name, email, "password123").await?;
        client.login(email, "password123").await?;
        Ok((client, user_id))
    }

    pub async fn count(&self, sql: &str, id: i64) -> Result<i64> {
        let (n,): (i64,) = sqlx::query_as(sql).bind(id).fetch_one(&self.state.pool).await?;
        Ok(n)
    }

    pub async fn count_by_text(&self, sql: &str, value: &str) -> Result<i64> {
        let (n,): (i64,) = sqlx::query_as(sql).bind(value).fetch_one(&self.state.pool).await?;
        Ok(n)
    }
}

/// Small valid PNG header plus padding; the server checks names and MIME,
/// not pixels.
pub fn write_png(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 64]);
    std::fs::write(&path, bytes).expect("write png");
    path
}
