/// Password hashing module using Argon2id
///
/// Passwords are hashed once at registration and only ever compared against
/// the stored PHC string afterwards. Plaintext is never persisted.
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB (65536 KB) by default
/// - **Iterations**: 3 passes by default
/// - **Parallelism**: 4 lanes by default
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use taskvault_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// One-way credential hashing
///
/// The auth service only talks to this trait, so the hashing scheme can be
/// tuned (or swapped) without touching registration or login.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password into a self-describing digest
    fn hash(&self, plain: &str) -> Result<String, PasswordError>;

    /// Checks a plaintext password against a digest produced by [`hash`](Self::hash)
    fn matches(&self, plain: &str, digest: &str) -> Result<bool, PasswordError>;
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Hasher {
    /// Memory cost in KiB
    pub m_cost: u32,

    /// Number of passes
    pub t_cost: u32,

    /// Degree of parallelism
    pub p_cost: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            m_cost: 65536, // 64 MB
            t_cost: 3,
            p_cost: 4,
        }
    }
}

impl Argon2Hasher {
    /// Creates a hasher with custom cost parameters
    pub fn new(m_cost: u32, t_cost: u32, p_cost: u32) -> Self {
        Self {
            m_cost,
            t_cost,
            p_cost,
        }
    }

    fn params(&self) -> Result<Params, PasswordError> {
        ParamsBuilder::new()
            .m_cost(self.m_cost)
            .t_cost(self.t_cost)
            .p_cost(self.p_cost)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, self.params()?);

        let password_hash = argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    fn matches(&self, plain: &str, digest: &str) -> Result<bool, PasswordError> {
        verify_password(plain, digest)
    }
}

/// Hashes a password using Argon2id with the default parameters
///
/// Returns a PHC string such as
/// `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    Argon2Hasher::default().hash(password)
}

/// Verifies a password against a PHC hash
///
/// Parameters are read back from the hash itself, so digests produced with
/// non-default costs verify too. Comparison is constant-time.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;
    if parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash("Missing hash output".to_string()));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}
