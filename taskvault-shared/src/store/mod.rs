/// Durable user/task storage
///
/// Services never talk to a database directly; they go through the [`Store`]
/// trait. Two backends are provided:
///
/// - [`PgStore`]: PostgreSQL via sqlx (production)
/// - [`MemoryStore`]: in-process maps (development and tests)
///
/// Every task method that touches an existing row takes the owner's ID and
/// matches on `(task id, owner id)` jointly. Each call is a single atomic
/// row operation; concurrent writes to the same task are last-write-wins.

use async_trait::async_trait;

use crate::models::{
    task::{NewTask, Task},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. duplicate email)
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage operations used by the auth and task services
#[async_trait]
pub trait Store: Send + Sync {
    /// Finds a user by exact email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Finds a user by ID
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Inserts a new user
    ///
    /// Fails with [`StoreError::Duplicate`] if the email is taken.
    async fn save_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Deletes a user and all tasks they own
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;

    /// Lists an owner's tasks, newest-created first
    async fn list_tasks_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError>;

    /// Finds a task only if it exists *and* belongs to `owner_id`
    async fn find_task_by_id_and_owner(
        &self,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Task>, StoreError>;

    /// Inserts a new task
    async fn insert_task(&self, data: NewTask) -> Result<Task, StoreError>;

    /// Persists title, description, status and `updated_at` of an existing task
    ///
    /// Matches on `(task.id, task.owner_id)`. Returns `None` if no such row.
    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError>;

    /// Deletes a task if it belongs to `owner_id`
    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<bool, StoreError>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
