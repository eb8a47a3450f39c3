/// Identity resolver
///
/// The single way to turn a request's [`IdentityContext`] into a stored user.
/// Fails with [`Error::NotAuthenticated`] when the context is anonymous or its
/// subject no longer maps to an account.

use std::sync::Arc;
use tracing::debug;

use super::middleware::IdentityContext;
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::store::Store;

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn Store>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Loads the caller's user record
    pub async fn current_user(&self, identity: &IdentityContext) -> Result<User> {
        let subject = identity.subject().ok_or(Error::NotAuthenticated)?;

        match self.store.find_user_by_email(subject).await? {
            Some(user) => Ok(user),
            None => {
                debug!("Token subject has no matching user");
                Err(Error::NotAuthenticated)
            }
        }
    }

    /// Caller's numeric ID
    pub async fn current_user_id(&self, identity: &IdentityContext) -> Result<i64> {
        Ok(self.current_user(identity).await?.id)
    }
}
