/// JWT token issuance and validation
///
/// Identity tokens are self-contained bearer credentials signed with HS256
/// (HMAC-SHA256). Nothing about a token is stored server-side: validation
/// needs only the token, the current time, and the process-wide secret.
///
/// # Claims
///
/// - `sub`: Subject (the user's email address)
/// - `userId`: Numeric user ID
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration (Unix timestamp), always `iat + ttl`
///
/// # Failure Modes
///
/// Malformed tokens, signature mismatches and expired tokens all surface as
/// the same [`JwtError::InvalidToken`] variant so callers cannot tell them
/// apart.
///
/// # Example
///
/// ```
/// use taskvault_shared::auth::jwt::TokenService;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new("a-secret-key-that-is-at-least-32-bytes", Duration::hours(24))?;
///
/// let token = tokens.issue("alice@example.com", 42)?;
/// let claims = tokens.validate(&token)?;
/// assert_eq!(claims.sub, "alice@example.com");
/// assert_eq!(claims.user_id, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Minimum accepted secret length in bytes (256 bits for HS256)
pub const MIN_SECRET_LEN: usize = 32;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Signing key or TTL is unusable. Raised once, at startup.
    #[error("Token service misconfigured: {0}")]
    Misconfigured(String),

    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token is malformed, carries a bad signature, or has expired
    #[error("Invalid token")]
    InvalidToken,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user's email address
    pub sub: String,

    /// Numeric user ID (custom claim)
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Builds claims issued at `now` that expire after `ttl`
    pub fn new(subject: impl Into<String>, user_id: i64, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject.into(),
            user_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the claims have expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets time remaining until expiration, if any
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Option<Duration> {
        let now = now.timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Issues and validates signed identity tokens
///
/// Holds the signing keys derived from the configured secret. Read-only after
/// construction.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    /// Creates a token service from the process-wide secret and token TTL
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Misconfigured` if the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes or the TTL is not positive.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::Misconfigured(format!(
                "secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if ttl <= Duration::zero() {
            return Err(JwtError::Misconfigured(
                "token expiration must be positive".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Configured token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `subject` and `user_id`, valid from now
    pub fn issue(&self, subject: &str, user_id: i64) -> Result<String, JwtError> {
        self.issue_at(subject, user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`
    pub fn issue_at(
        &self,
        subject: &str,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject, user_id, now, self.ttl);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token against the current time
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_at(token, Utc::now())
    }

    /// Validates a token as if the current time were `now`
    ///
    /// Verifies the HS256 signature, then requires `now < exp` with zero
    /// leeway.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| JwtError::InvalidToken)?
            .claims;

        if claims.is_expired_at(now) {
            return Err(JwtError::InvalidToken);
        }

        Ok(claims)
    }
}
