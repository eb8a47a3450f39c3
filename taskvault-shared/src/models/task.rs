/// Task model and database operations
///
/// Every task has exactly one owner, fixed at creation. All queries that touch
/// an existing task filter on `(id, owner_id)` together; there is no query in
/// this module that reads or writes a task by ID alone.
///
/// # Status
///
/// ```text
/// PENDING → IN_PROGRESS → COMPLETED
/// ```
///
/// The arrow is the intended workflow only. Any status may be set to any other
/// status directly; ownership is the only rule enforced.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('PENDING', 'IN_PROGRESS', 'COMPLETED');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description VARCHAR(1000),
///     status task_status NOT NULL DEFAULT 'PENDING',
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Converts status to its stored/wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Owning user. Immutable after creation.
    #[serde(skip_serializing)]
    pub owner_id: i64,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last modified
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied task fields
///
/// The owner comes from the authenticated caller and timestamps from the
/// service clock, so neither appears here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    /// Task title
    pub title: String,

    /// Task description (`None` clears it on update)
    pub description: Option<String>,

    /// Task status (`None` means PENDING on create, unchanged on update)
    pub status: Option<TaskStatus>,
}

/// Fully-resolved row for insertion
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Inserts a new task
    pub async fn create(pool: &PgPool, data: NewTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.created_at)
        .bind(data.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// Returns `None` both when the task does not exist and when it belongs to
    /// someone else.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, status, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists an owner's tasks, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, description, status, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Writes the mutable fields of `task` back to its row
    ///
    /// The row is matched on `(id, owner_id)`; `owner_id` and `created_at` are
    /// never part of the SET list. Returns `None` if the row is gone.
    pub async fn save(pool: &PgPool, task: &Task) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3,
                description = $4,
                status = $5,
                updated_at = $6
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(task.id)
        .bind(task.owner_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.updated_at)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task, scoped to its owner
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
