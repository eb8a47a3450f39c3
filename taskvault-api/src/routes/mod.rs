/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `tasks`: Caller-owned task CRUD

pub mod auth;
pub mod health;
pub mod tasks;

use validator::ValidationError;

/// Rejects strings that are empty or whitespace only
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
