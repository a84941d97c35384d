//! User use-cases backed by the document store port.
//!
//! Validation happens before these methods are reachable (they only accept
//! validated domain values), so every call here goes straight to the store.
//! Store failures are not recovered: they surface as internal errors and the
//! transport decides how to render them.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info};

use super::ports::{UserStore, UserStoreError, UsersCommand, UsersQuery};
use super::{Error, NewUser, User, UserId, UserUpdate};

/// Implements [`UsersCommand`] and [`UsersQuery`] over an injected store.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use user_service::domain::UserService;
/// use user_service::outbound::store::InMemoryUserStore;
///
/// let service = UserService::new(Arc::new(InMemoryUserStore::new()));
/// # let _ = service;
/// ```
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

fn map_store_error(operation: &'static str, err: UserStoreError) -> Error {
    error!(operation, error = %err, "user store call failed");
    Error::internal(format!("user store {operation} failed"))
}

#[async_trait]
impl UsersCommand for UserService {
    async fn create_user(&self, user: NewUser) -> Result<User, Error> {
        let id = self
            .store
            .insert(&user)
            .await
            .map_err(|err| map_store_error("insert", err))?;
        info!(user_id = %id, "user created");
        Ok(user.into_user(id))
    }

    async fn update_user(&self, update: UserUpdate) -> Result<Value, Error> {
        let ack = self
            .store
            .update_child(update.user_id(), update.changes())
            .await
            .map_err(|err| map_store_error("update", err))?;
        info!(user_id = %update.user_id(), "user updated");
        Ok(ack)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        self.store
            .remove_child(id)
            .await
            .map_err(|err| map_store_error("remove", err))?;
        info!(user_id = %id, "user removed");
        Ok(())
    }
}

#[async_trait]
impl UsersQuery for UserService {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let records = self
            .store
            .fetch_all()
            .await
            .map_err(|err| map_store_error("fetch", err))?;
        debug!(count = records.len(), "users fetched");
        Ok(records
            .into_iter()
            .map(|(id, record)| User::from_record(id, record))
            .collect())
    }
}
