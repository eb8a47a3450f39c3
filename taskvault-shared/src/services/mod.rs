/// Business logic
///
/// - [`auth`]: registration and login
/// - [`tasks`]: ownership-scoped task CRUD

pub mod auth;
pub mod tasks;

pub use auth::{AuthService, AuthSession, Credentials, RegisterUser};
pub use tasks::TaskService;
