/// In-memory [`Store`]
///
/// Mirrors the PostgreSQL schema's rules: sequential IDs, unique emails,
/// owner-scoped task access, and cascade on user delete. All state sits behind
/// one `RwLock`, so every call is atomic with respect to the others.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{
    task::{NewTask, Task},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

/// Store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::Duplicate("users_email_key".to_string()));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            email: data.email,
            name: data.name,
            password_hash: data.password_hash,
            created_at: data.created_at,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, task| task.owner_id != id);

        Ok(true)
    }

    async fn list_tasks_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;

        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(tasks)
    }

    async fn find_task_by_id_and_owner(
        &self,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn insert_task(&self, data: NewTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;

        tables.last_task_id += 1;
        let task = Task {
            id: tables.last_task_id,
            owner_id: data.owner_id,
            title: data.title,
            description: data.description,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn save_task(&self, task: &Task) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables
            .tasks
            .get_mut(&task.id)
            .filter(|t| t.owner_id == task.owner_id)
        else {
            return Ok(None);
        };

        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.status = task.status;
        stored.updated_at = task.updated_at;

        Ok(Some(stored.clone()))
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        let owned = tables
            .tasks
            .get(&id)
            .is_some_and(|t| t.owner_id == owner_id);
        if owned {
            tables.tasks.remove(&id);
        }

        Ok(owned)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
