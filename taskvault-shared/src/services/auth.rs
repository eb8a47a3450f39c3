/// Registration and login
///
/// Both flows end by issuing a bearer token. Password hashing and verification
/// are CPU-heavy, so they run on tokio's blocking pool.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::auth::{jwt::TokenService, password::CredentialHasher};
use crate::error::{Error, Result};
use crate::models::user::{CreateUser, User};
use crate::store::{Store, StoreError};

/// Registration input, already validated by the caller
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Issued token plus the public identity it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub email: String,
    pub name: String,
    pub user_id: i64,
}

/// Plaintext behind the digest that unknown-email logins are checked against
const DUMMY_PASSWORD: &str = "taskvault-dummy-password";

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: TokenService,
    dummy_digest: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn CredentialHasher>, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
            dummy_digest: Arc::new(OnceCell::new()),
        }
    }

    /// Creates an account and signs the new user in
    ///
    /// # Errors
    ///
    /// [`Error::EmailAlreadyRegistered`] if the email exists, including when a
    /// concurrent registration wins the race at the store's unique constraint.
    pub async fn register(&self, input: RegisterUser) -> Result<AuthSession> {
        if self.store.find_user_by_email(&input.email).await?.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(Error::EmailAlreadyRegistered);
        }

        let hasher = Arc::clone(&self.hasher);
        let password = input.password;
        let password_hash =
            tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

        let user = self
            .store
            .save_user(CreateUser {
                email: input.email,
                name: input.name,
                password_hash,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => Error::EmailAlreadyRegistered,
                other => Error::Store(other),
            })?;

        info!(user_id = user.id, "User registered");
        self.session_for(user)
    }

    /// Verifies credentials and issues a token
    ///
    /// Unknown email and wrong password both yield
    /// [`Error::InvalidCredential`].
    pub async fn login(&self, credentials: Credentials) -> Result<AuthSession> {
        let Some(user) = self.store.find_user_by_email(&credentials.email).await? else {
            // Unknown emails pay for one verification too
            let digest = self.dummy_digest().await?;
            self.verify(credentials.password, digest).await?;
            debug!("Login failed");
            return Err(Error::InvalidCredential);
        };

        let digest = user.password_hash.clone();
        if !self.verify(credentials.password, digest).await? {
            debug!("Login failed");
            return Err(Error::InvalidCredential);
        }

        info!(user_id = user.id, "User logged in");
        self.session_for(user)
    }

    async fn verify(&self, password: String, digest: String) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        let matches =
            tokio::task::spawn_blocking(move || hasher.matches(&password, &digest)).await??;
        Ok(matches)
    }

    /// Digest of [`DUMMY_PASSWORD`], hashed once with this service's hasher
    async fn dummy_digest(&self) -> Result<String> {
        let digest = self
            .dummy_digest
            .get_or_try_init(|| async {
                let hasher = Arc::clone(&self.hasher);
                let digest = tokio::task::spawn_blocking(move || hasher.hash(DUMMY_PASSWORD)).await??;
                Ok::<_, Error>(digest)
            })
            .await?;
        Ok(digest.clone())
    }

    fn session_for(&self, user: User) -> Result<AuthSession> {
        let token = self.tokens.issue(&user.email, user.id)?;

        Ok(AuthSession {
            token,
            email: user.email,
            name: user.name,
            user_id: user.id,
        })
    }
}
