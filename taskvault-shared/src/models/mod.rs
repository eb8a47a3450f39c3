/// Database models for taskvault
///
/// # Models
///
/// - `user`: Accounts and credentials
/// - `task`: Owner-scoped tasks
///
/// Query functions take a `&PgPool` directly. Most callers should go through
/// [`crate::store::Store`] instead, which also has an in-memory backend.

pub mod task;
pub mod user;
