/// Domain error type shared by the auth and task services
///
/// The four domain variants are the only failures a client ever learns about.
/// Everything else is an internal fault and is reported without detail.

use crate::auth::{jwt::JwtError, password::PasswordError};
use crate::store::StoreError;

/// Result alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad email or password at login. Never says which.
    #[error("Invalid email or password")]
    InvalidCredential,

    /// Registration with an email that already exists
    #[error("Email is already registered")]
    EmailAlreadyRegistered,

    /// No resolvable identity where one is required
    #[error("Authentication required")]
    NotAuthenticated,

    /// Resource is absent or owned by someone else
    #[error("Resource not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("blocking task failed: {}", err))
    }
}
