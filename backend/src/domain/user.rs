//! User data model.
//!
//! `User` is the shape returned to clients, `UserRecord` is what the document
//! store holds (fields may be missing), and `NewUser`/`UserUpdate` are the
//! validated inputs produced by [`crate::domain::user_validation`].

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned user identifier.
///
/// Identifiers are opaque: the store decides their format, so no syntax is
/// enforced here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Mutable user attributes accepted by create and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    Name,
    Location,
}

impl UserField {
    /// Every field a client may set, in the order they are reported.
    pub const ALL: [UserField; 2] = [UserField::Name, UserField::Location];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Location => "location",
        }
    }

    /// Resolve a wire key, returning `None` for anything outside the allowed set.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record as held by the document store.
///
/// Records may be partially populated; readers default missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Application user as returned to clients.
///
/// ## Invariants
/// - `id` is the store-assigned key the record was read from or written to.
/// - `name` and `location` are empty strings only when the stored record
///   lacked them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "-NpQ2t0Zk1f0a9XyB3cD")]
    id: UserId,
    #[schema(example = "Ann")]
    name: String,
    #[schema(example = "NYC")]
    location: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location: location.into(),
        }
    }

    /// Build a user from a stored record, defaulting missing fields to `""`.
    pub fn from_record(id: UserId, record: UserRecord) -> Self {
        let UserRecord { name, location } = record;
        Self::new(id, name.unwrap_or_default(), location.unwrap_or_default())
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn location(&self) -> &str {
        self.location.as_str()
    }
}

/// Validated payload for creating a user.
///
/// ## Invariants
/// - `name` and `location` are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    name: String,
    location: String,
}

impl NewUser {
    pub(crate) fn from_validated(name: String, location: String) -> Self {
        Self { name, location }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Attach the identifier the store assigned on insert.
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.name, self.location)
    }
}

/// Validated partial record applied by an update.
///
/// Serialises to exactly the keys that were supplied; an empty change set
/// serialises to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

impl UserChanges {
    pub(crate) fn set(&mut self, field: UserField, value: String) {
        match field {
            UserField::Name => self.name = Some(value),
            UserField::Location => self.location = Some(value),
        }
    }

    pub fn get(&self, field: UserField) -> Option<&str> {
        match field {
            UserField::Name => self.name.as_deref(),
            UserField::Location => self.location.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none()
    }

    /// Merge the changes into an existing record.
    pub fn apply_to(&self, record: &mut UserRecord) {
        if let Some(name) = &self.name {
            record.name = Some(name.clone());
        }
        if let Some(location) = &self.location {
            record.location = Some(location.clone());
        }
    }
}

/// Validated update targeting a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    user_id: UserId,
    changes: UserChanges,
}

impl UserUpdate {
    pub(crate) fn from_validated(user_id: UserId, changes: UserChanges) -> Self {
        Self { user_id, changes }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn changes(&self) -> &UserChanges {
        &self.changes
    }
}
