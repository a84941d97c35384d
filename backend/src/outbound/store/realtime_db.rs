//! Reqwest-backed adapter for a Firebase-style realtime document database.
//!
//! The adapter owns transport details only: URL construction, optional
//! `auth` query token, timeout and HTTP status mapping, and JSON decoding.
//!
//! Wire mapping:
//! - insert: `POST {base}/{collection}.json`, reply `{"name": "<key>"}`
//! - fetch all: `GET {base}/{collection}.json`, reply `null` or `{key: record}`
//! - update child: `PATCH {base}/{collection}/{key}.json`, reply echoes the patch
//! - remove child: `DELETE {base}/{collection}/{key}.json`, reply `null`

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{NewUser, UserChanges, UserId, UserRecord};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Connection settings for [`RealtimeDbUserStore`].
#[derive(Debug, Clone)]
pub struct RealtimeDbSettings {
    /// Database root, e.g. `https://example-default-rtdb.firebaseio.com/`.
    pub base_url: Url,
    /// Slash-separated path of the user collection below the root.
    pub collection: String,
    /// Optional database secret or ID token sent as the `auth` query parameter.
    pub auth_token: Option<String>,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
}

/// Failures raised while constructing the adapter.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeDbSetupError {
    #[error("store URL {0} cannot carry a path")]
    InvalidBaseUrl(Url),
    #[error("store collection path must not be empty")]
    EmptyCollection,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// [`UserStore`] backed by the realtime database REST API.
#[derive(Debug, Clone)]
pub struct RealtimeDbUserStore {
    client: Client,
    base_url: Url,
    collection: Vec<String>,
    auth_token: Option<String>,
}

#[derive(Deserialize)]
struct PushReply {
    name: String,
}

impl RealtimeDbUserStore {
    /// Build an adapter with a dedicated reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot have path segments, the
    /// collection path is empty, or the client cannot be constructed.
    pub fn new(settings: RealtimeDbSettings) -> Result<Self, RealtimeDbSetupError> {
        let RealtimeDbSettings {
            base_url,
            collection,
            auth_token,
            timeout,
        } = settings;
        if base_url.cannot_be_a_base() {
            return Err(RealtimeDbSetupError::InvalidBaseUrl(base_url));
        }
        let collection: Vec<String> = collection
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        if collection.is_empty() {
            return Err(RealtimeDbSetupError::EmptyCollection);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            collection,
            auth_token,
        })
    }

    fn endpoint(&self, leaf: Option<&UserId>) -> Result<Url, UserStoreError> {
        let mut segments: Vec<String> = self.collection.clone();
        match leaf {
            // An empty key would address the whole collection.
            Some(id) if id.is_empty() => {
                return Err(UserStoreError::rejected("child key must not be empty"));
            }
            Some(id) => segments.push(format!("{id}.json")),
            None => {
                if let Some(last) = segments.last_mut() {
                    last.push_str(".json");
                }
            }
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UserStoreError::rejected("store URL cannot carry a path"))?
            .pop_if_empty()
            .extend(&segments);
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, UserStoreError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, path = url.path(), "user store request");
        self.client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

#[async_trait]
impl UserStore for RealtimeDbUserStore {
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserStoreError> {
        let url = self.endpoint(None)?;
        let body = self.send(self.request(Method::POST, url).json(user)).await?;
        let reply: PushReply = decode(&body)?;
        Ok(UserId::new(reply.name))
    }

    async fn fetch_all(&self) -> Result<BTreeMap<UserId, UserRecord>, UserStoreError> {
        let url = self.endpoint(None)?;
        let body = self.send(self.request(Method::GET, url)).await?;
        decode_collection(&body)
    }

    async fn update_child(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Value, UserStoreError> {
        let url = self.endpoint(Some(id))?;
        let body = self
            .send(self.request(Method::PATCH, url).json(changes))
            .await?;
        decode(&body)
    }

    async fn remove_child(&self, id: &UserId) -> Result<(), UserStoreError> {
        let url = self.endpoint(Some(id))?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, UserStoreError> {
    serde_json::from_slice(body).map_err(|err| {
        UserStoreError::decode(format!("invalid store JSON payload: {err}"))
    })
}

fn decode_collection(body: &[u8]) -> Result<BTreeMap<UserId, UserRecord>, UserStoreError> {
    let records: Option<BTreeMap<String, UserRecord>> = decode(body)?;
    Ok(records
        .unwrap_or_default()
        .into_iter()
        .map(|(key, record)| (UserId::new(key), record))
        .collect())
}

fn map_transport_error(error: reqwest::Error) -> UserStoreError {
    if error.is_timeout() {
        UserStoreError::timeout(error.to_string())
    } else {
        UserStoreError::connection(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UserStoreError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            UserStoreError::timeout(message)
        }
        _ if status.is_client_error() => UserStoreError::rejected(message),
        _ => UserStoreError::connection(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    trimmed.chars().take(BODY_PREVIEW_LIMIT).collect()
}
