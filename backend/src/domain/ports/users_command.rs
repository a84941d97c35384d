//! Driving port for user mutations.
//!
//! Inbound adapters hand over already-validated inputs; implementations only
//! delegate to the store and translate its failures.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, NewUser, User, UserId, UserUpdate};

/// Domain use-case port for creating, updating, and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Store a new user and return it with its assigned identifier.
    async fn create_user(&self, user: NewUser) -> Result<User, Error>;

    /// Apply a validated update and return the store acknowledgment verbatim.
    async fn update_user(&self, update: UserUpdate) -> Result<Value, Error>;

    /// Remove a user. Succeeds whether or not the identifier existed.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
