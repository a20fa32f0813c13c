/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasknest_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasknest_shared::auth::middleware::{authenticate_token, bearer_token};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor; cheap to
/// clone (pool handle + Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Session lifetime for newly opened sessions
    pub fn session_ttl_days(&self) -> i64 {
        self.config.session.ttl_days
    }
}

/// Builds the complete axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                      # Service info (public)
/// ├── GET  /health                # Health check (public)
/// ├── POST /signup                # Create account + session (public)
/// ├── POST /signin                # Open session (public)
/// ├── POST /signout               # Revoke session (session)
/// ├── GET  /me                    # Current user (session)
/// └── /tasks                      # (session)
///     ├── GET  /                  # Open tasks
///     ├── GET  /completed         # Completed tasks, newest first
///     ├── POST /create            # Create task
///     ├── GET  /:id               # View task
///     ├── POST /:id               # Update task
///     ├── POST /:id/complete      # Mark completed
///     └── POST /:id/delete        # Delete task
/// ```
///
/// Handlers behind the session layer are unreachable without a valid
/// session; the layer rejects before any handler store access.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no session required
    let public_routes = Router::new()
        .route("/", get(routes::home::home))
        .route("/health", get(routes::home::health_check))
        .route("/signup", post(routes::auth::signup))
        .route("/signin", post(routes::auth::signin));

    // Account routes behind the session layer
    let account_routes = Router::new()
        .route("/signout", post(routes::auth::signout))
        .route("/me", get(routes::auth::me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Task routes behind the session layer
    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_open))
        .route("/completed", get(routes::tasks::list_completed))
        .route("/create", post(routes::tasks::create))
        .route("/:id", get(routes::tasks::detail))
        .route("/:id", post(routes::tasks::update))
        .route("/:id/complete", post(routes::tasks::complete))
        .route("/:id/delete", post(routes::tasks::delete))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(account_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Extracts the bearer token from the Authorization header, resolves it to
/// a user via the session store, and injects `CurrentUser` into request
/// extensions. Fails closed on any missing or invalid credential.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = bearer_token(auth_header)?;

    let current_user = authenticate_token(&state.db, token).await?;

    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}
