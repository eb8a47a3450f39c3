/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskvault_api::{app::AppState, config::Config};
/// use taskvault_shared::{auth::password::Argon2Hasher, store::MemoryStore};
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(config, Arc::new(MemoryStore::new()), Arc::new(Argon2Hasher::default()))?;
/// let app = taskvault_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use taskvault_shared::{
    auth::{
        identity::IdentityResolver,
        jwt::{JwtError, TokenService},
        middleware::authenticate_request,
        password::CredentialHasher,
    },
    services::{AuthService, TaskService},
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Durable user/task store
    pub store: Arc<dyn Store>,

    /// Token issuance and validation
    pub tokens: TokenService,

    /// Maps a request's identity to a stored user
    pub identity: IdentityResolver,

    /// Registration and login
    pub auth: AuthService,

    /// Ownership-scoped task operations
    pub tasks: TaskService,
}

impl AppState {
    /// Wires services around a store and hasher
    ///
    /// # Errors
    ///
    /// Fails if the JWT secret or expiration in `config` is unusable.
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Result<Self, JwtError> {
        let tokens = TokenService::new(
            &config.jwt.secret,
            chrono::Duration::seconds(config.jwt.expiration_seconds),
        )?;

        Ok(Self {
            identity: IdentityResolver::new(Arc::clone(&store)),
            auth: AuthService::new(Arc::clone(&store), hasher, tokens.clone()),
            tasks: TaskService::new(Arc::clone(&store)),
            config: Arc::new(config),
            store,
            tokens,
        })
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health                # Health check (public)
/// ├── /api/auth/                    # Public authentication endpoints
/// │   ├── POST /register
/// │   └── POST /login
/// └── /api/tasks                    # Caller's tasks (identity required)
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /:id
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Request authenticator (every route, never rejects)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let cors = cors_layer(&state.config.api.cors_origins);
    let production = state.config.api.production;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            authenticate_layer,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

/// Configures CORS based on environment
fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    if cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Request authenticator layer
///
/// Attaches an `IdentityContext` to every request and always continues.
async fn authenticate_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    authenticate_request(&state.tokens, &mut req);
    next.run(req).await
}
