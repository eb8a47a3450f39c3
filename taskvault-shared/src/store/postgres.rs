/// PostgreSQL-backed [`Store`]

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, StoreError};
use crate::db::pool::health_check;
use crate::models::{
    task::{NewTask, Task},
    user::{CreateUser, User},
};

/// Store backed by a sqlx PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps unique-constraint violations to [`StoreError::Duplicate`]
fn map_unique(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique constraint").to_string();
            return StoreError::Duplicate(constraint);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn save_user(&self, data: CreateUser) -> Result<User, StoreError> {
        User::create(&self.pool, data).await.map_err(map_unique)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn list_tasks_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn find_task_by_id_and_owner(
        &self,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_by_id_and_owner(&self.pool, id, owner_id).await?)
    }

    async fn insert_task(&self, data: NewTask) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        Ok(Task::save(&self.pool, task).await?)
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, id, owner_id).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
