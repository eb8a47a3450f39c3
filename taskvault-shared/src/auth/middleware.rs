/// Request authenticator for Axum
///
/// Runs once per request before any handler. It reads the `Authorization`
/// header, validates a bearer token if one is present, and stores an
/// [`IdentityContext`] in the request extensions.
///
/// The authenticator never rejects a request. A missing, malformed or invalid
/// credential simply leaves the context anonymous; endpoints that need a caller
/// fail later through [`IdentityResolver`](super::identity::IdentityResolver).
///
/// # Example
///
/// ```no_run
/// use axum::{extract::{Request, State}, middleware::{self, Next}, response::Response, routing::get, Router};
/// use taskvault_shared::auth::{jwt::TokenService, middleware::{authenticate_request, IdentityContext}};
///
/// async fn layer(State(tokens): State<TokenService>, mut req: Request, next: Next) -> Response {
///     authenticate_request(&tokens, &mut req);
///     next.run(req).await
/// }
///
/// async fn whoami(identity: IdentityContext) -> String {
///     identity.subject().unwrap_or("anonymous").to_string()
/// }
///
/// # fn build(tokens: TokenService) -> Router {
/// Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(tokens, layer))
/// # }
/// ```

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;
use tracing::debug;

use super::jwt::TokenService;

/// Path prefix of the registration and login endpoints
pub const PUBLIC_AUTH_PREFIX: &str = "/api/auth/";

/// Liveness endpoint, also reachable without credentials
pub const HEALTH_PATH: &str = "/health";

const BEARER_PREFIX: &str = "Bearer ";

/// Request-scoped identity
///
/// Holds the validated token subject (the caller's email), or nothing for an
/// anonymous request. Created once per request and dropped with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    subject: Option<String>,
}

impl IdentityContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    /// Validated subject, if any
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }
}

/// Returns true for paths that skip token validation entirely
pub fn is_public_path(path: &str) -> bool {
    path.starts_with(PUBLIC_AUTH_PREFIX) || path == HEALTH_PATH
}

/// Extracts the token from an `Authorization` header value
///
/// Accepts only the exact, case-sensitive `Bearer ` prefix followed by a
/// non-empty token. Anything else counts as no credential.
pub fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

/// Derives the identity context from request headers
pub fn authenticate(tokens: &TokenService, headers: &HeaderMap) -> IdentityContext {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
    else {
        return IdentityContext::anonymous();
    };

    match tokens.validate(token) {
        Ok(claims) => {
            debug!(user_id = claims.user_id, "Bearer token accepted");
            IdentityContext::authenticated(claims.sub)
        }
        Err(e) => {
            debug!(error = %e, "Bearer token rejected, continuing anonymously");
            IdentityContext::anonymous()
        }
    }
}

/// Authenticates a request in place
///
/// Public paths get an anonymous context without looking at the header. Any
/// context already present is replaced, so handlers see exactly one.
pub fn authenticate_request(tokens: &TokenService, req: &mut Request) {
    let identity = if is_public_path(req.uri().path()) {
        IdentityContext::anonymous()
    } else {
        authenticate(tokens, req.headers())
    };

    req.extensions_mut().insert(identity);
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for IdentityContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .unwrap_or_default())
    }
}
