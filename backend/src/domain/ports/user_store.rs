//! Driven port for the external document store holding user records.
//!
//! The store is treated as an opaque key-value service: it assigns
//! identifiers on insert, returns the whole collection on fetch, and applies
//! partial updates and removals by child key. No transactionality, ordering,
//! or idempotence is assumed beyond "eventually reflects the call".

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{NewUser, UserChanges, UserId, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Failures raised by user store adapters.
    pub enum UserStoreError {
        /// The store could not be reached.
        Connection { message: String } => "user store connection failed: {message}",
        /// The store did not answer within the configured timeout.
        Timeout { message: String } => "user store request timed out: {message}",
        /// The store refused the request.
        Rejected { message: String } => "user store rejected the request: {message}",
        /// The store replied with a payload that could not be decoded.
        Decode { message: String } => "user store returned an undecodable payload: {message}",
    }
}

/// Port over the user collection in the document store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Push a new record and return the identifier the store assigned.
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserStoreError>;

    /// Fetch every record keyed by identifier. An empty store yields an empty map.
    async fn fetch_all(&self) -> Result<BTreeMap<UserId, UserRecord>, UserStoreError>;

    /// Apply a partial update to one child and return the store's raw
    /// acknowledgment. Whether a missing child is created or rejected is up
    /// to the store.
    async fn update_child(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Value, UserStoreError>;

    /// Remove one child. Removing an absent child is not an error.
    async fn remove_child(&self, id: &UserId) -> Result<(), UserStoreError>;
}
