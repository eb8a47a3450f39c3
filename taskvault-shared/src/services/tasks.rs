/// Ownership-scoped task operations
///
/// Every operation takes the caller's resolved user ID. Access to an existing
/// task always goes through the store's joint `(task id, owner id)` match, so a
/// foreign task and a missing task produce the same [`Error::NotFound`].
///
/// Status values are not checked for workflow order; any status may replace
/// any other.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::task::{NewTask, Task, TaskFields};
use crate::store::Store;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Caller's tasks, newest-created first
    pub async fn list(&self, caller_id: i64) -> Result<Vec<Task>> {
        Ok(self.store.list_tasks_by_owner(caller_id).await?)
    }

    pub async fn get(&self, task_id: i64, caller_id: i64) -> Result<Task> {
        self.store
            .find_task_by_id_and_owner(task_id, caller_id)
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn create(&self, fields: TaskFields, caller_id: i64) -> Result<Task> {
        self.create_at(fields, caller_id, Utc::now()).await
    }

    /// Creates a task with both timestamps set to `now`
    pub async fn create_at(
        &self,
        fields: TaskFields,
        caller_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let task = self
            .store
            .insert_task(NewTask {
                owner_id: caller_id,
                title: fields.title,
                description: fields.description,
                status: fields.status.unwrap_or_default(),
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(task_id = task.id, owner_id = caller_id, "Task created");
        Ok(task)
    }

    pub async fn update(&self, task_id: i64, fields: TaskFields, caller_id: i64) -> Result<Task> {
        self.update_at(task_id, fields, caller_id, Utc::now()).await
    }

    /// Replaces title and description, and status when given
    ///
    /// The owner and `created_at` are never touched; `updated_at` becomes `now`.
    pub async fn update_at(
        &self,
        task_id: i64,
        fields: TaskFields,
        caller_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let mut task = self.get(task_id, caller_id).await?;

        task.title = fields.title;
        task.description = fields.description;
        if let Some(status) = fields.status {
            task.status = status;
        }
        task.updated_at = now;

        // The row can vanish between the read and the write
        let saved = self.store.save_task(&task).await?.ok_or(Error::NotFound)?;

        debug!(task_id, status = saved.status.as_str(), "Task updated");
        Ok(saved)
    }

    pub async fn delete(&self, task_id: i64, caller_id: i64) -> Result<()> {
        if !self.store.delete_task(task_id, caller_id).await? {
            return Err(Error::NotFound);
        }

        info!(task_id, owner_id = caller_id, "Task deleted");
        Ok(())
    }
}
