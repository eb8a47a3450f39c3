/// Authentication and identity
///
/// # Modules
///
/// - [`password`]: Argon2id credential hashing
/// - [`jwt`]: signed, time-limited bearer tokens
/// - [`middleware`]: per-request authenticator and [`IdentityContext`](middleware::IdentityContext)
/// - [`identity`]: resolves the context to a stored user
///
/// # Example
///
/// ```no_run
/// use chrono::Duration;
/// use taskvault_shared::auth::jwt::TokenService;
/// use taskvault_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let tokens = TokenService::new("a-secret-of-at-least-thirty-two-bytes!", Duration::hours(24))?;
/// let token = tokens.issue("alice@example.com", 1)?;
/// let claims = tokens.validate(&token)?;
/// assert_eq!(claims.user_id, 1);
/// # Ok(())
/// # }
/// ```

pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;
