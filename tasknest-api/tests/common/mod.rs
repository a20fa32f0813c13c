/// Common test utilities for integration tests
///
/// Shared infrastructure for driving the full router against a live
/// PostgreSQL database: config loading, migrations, account creation, and
/// small request/response helpers.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use tasknest_api::app::{build_router, AppState};
use tasknest_api::config::Config;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

/// A signed-up account with its session token
pub struct TestAccount {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context against the configured database
    ///
    /// `DATABASE_URL` must point at a disposable database; migrations run
    /// on setup.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Signs up a fresh account with a unique username
    pub async fn signup(&self, prefix: &str) -> anyhow::Result<TestAccount> {
        let username = format!("{}-{}", prefix, Uuid::new_v4());

        let response = self
            .request(
                "POST",
                "/signup",
                None,
                Some(json!({
                    "username": username,
                    "password": "correct horse battery",
                    "password_confirm": "correct horse battery",
                })),
            )
            .await;

        let status = response.status();
        let body = read_json(response).await;
        anyhow::ensure!(
            status == StatusCode::CREATED,
            "signup failed with {}: {}",
            status,
            body
        );

        Ok(TestAccount {
            user_id: Uuid::parse_str(body["user_id"].as_str().unwrap())?,
            username,
            token: body["token"].as_str().unwrap().to_string(),
        })
    }

    /// Sends a request through the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().call(request).await.unwrap()
    }

    /// Creates a task for an account, returning its ID
    pub async fn create_task(&self, account: &TestAccount, title: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/tasks/create",
                Some(&account.token),
                Some(json!({
                    "title": title,
                    "description": format!("description of {}", title),
                })),
            )
            .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
    }
}

/// Reads a response body as JSON
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
