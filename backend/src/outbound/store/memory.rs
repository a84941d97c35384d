//! In-process user store.
//!
//! Mirrors the document store's observable semantics closely enough for the
//! HTTP layer to behave identically: inserts get a fresh opaque key, updates
//! upsert the child and echo the patch, an empty patch writes nothing, and
//! removals of absent children succeed.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{NewUser, UserChanges, UserId, UserRecord};

/// Map-backed [`UserStore`].
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    records: RwLock<BTreeMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, including partial ones.
    ///
    /// # Examples
    /// ```
    /// use user_service::domain::{UserId, UserRecord};
    /// use user_service::outbound::store::InMemoryUserStore;
    ///
    /// let store = InMemoryUserStore::with_records([(
    ///     UserId::new("legacy"),
    ///     UserRecord { name: Some("Ann".into()), location: None },
    /// )]);
    /// # let _ = store;
    /// ```
    pub fn with_records(records: impl IntoIterator<Item = (UserId, UserRecord)>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of one record, if present.
    pub async fn get(&self, id: &UserId) -> Option<UserRecord> {
        self.records.read().await.get(id).cloned()
    }
}

fn changes_to_ack(changes: &UserChanges) -> Result<Value, UserStoreError> {
    serde_json::to_value(changes).map_err(|err| UserStoreError::decode(err.to_string()))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserStoreError> {
        let id = UserId::new(Uuid::new_v4().simple().to_string());
        let record = UserRecord {
            name: Some(user.name().to_owned()),
            location: Some(user.location().to_owned()),
        };
        self.records.write().await.insert(id.clone(), record);
        Ok(id)
    }

    async fn fetch_all(&self) -> Result<BTreeMap<UserId, UserRecord>, UserStoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn update_child(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Value, UserStoreError> {
        let ack = changes_to_ack(changes)?;
        if changes.is_empty() {
            return Ok(ack);
        }
        let mut records = self.records.write().await;
        let record = records.entry(id.clone()).or_default();
        changes.apply_to(record);
        Ok(ack)
    }

    async fn remove_child(&self, id: &UserId) -> Result<(), UserStoreError> {
        self.records.write().await.remove(id);
        Ok(())
    }
}
