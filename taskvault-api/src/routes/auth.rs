/// Authentication endpoints
///
/// Both endpoints are public; the request authenticator never inspects their
/// headers.
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token

use crate::{app::AppState, error::ApiResult, routes::not_blank};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use taskvault_shared::services::{AuthSession, Credentials, RegisterUser};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(min = 2, max = 50, message = "Name must be between 2 and 50 characters")
    )]
    pub name: String,

    /// Email address
    #[validate(email(message = "Email must be valid"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Alice",
///   "email": "alice@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "email": "alice@example.com",
///   "name": "Alice",
///   "userId": 1
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Body is not valid JSON
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<AuthSession>> {
    let Json(req) = payload?;
    req.validate()?;

    let session = state
        .auth
        .register(RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(session))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "alice@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same body for both)
/// - `422 Unprocessable Entity`: Empty email or password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthSession>> {
    let Json(req) = payload?;
    req.validate()?;

    let session = state
        .auth
        .login(Credentials {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register_request("Alice", "alice@example.com", "secret1")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_register_request_rules() {
        let errors = register_request("A", "not-an-email", "12345")
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_register_request_blank_name() {
        let errors = register_request("   ", "alice@example.com", "secret1")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_register_request_name_too_long() {
        let name = "x".repeat(51);
        assert!(register_request(&name, "alice@example.com", "secret1")
            .validate()
            .is_err());
    }
}
