//! Server configuration loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `USER_SERVICE_*` environment variables
//! and configuration files. Listener and store tuning fields carry defaults so
//! the service starts with no configuration at all; the store URL and token
//! stay optional.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::outbound::store::RealtimeDbSettings;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_COLLECTION: &str = "users";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid store URL {url:?}: {source}")]
    InvalidStoreUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration values for the HTTP server and its user store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServerSettings {
    /// Address the HTTP listener binds to.
    #[ortho_config(default = DEFAULT_HOST)]
    pub host: IpAddr,
    /// Port the HTTP listener binds to.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// Realtime database root URL. When unset, users are kept in memory.
    pub store_url: Option<String>,
    /// Token passed to the realtime database as the `auth` query parameter.
    pub store_auth_token: Option<String>,
    /// Collection path holding user records.
    #[ortho_config(default = DEFAULT_COLLECTION.to_owned())]
    pub store_collection: String,
    /// Per-request timeout for store calls, in seconds.
    #[ortho_config(default = DEFAULT_STORE_TIMEOUT_SECS)]
    pub store_timeout_secs: u64,
}

impl ServerSettings {
    /// Socket address for the HTTP listener.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Realtime database settings, or `None` when no store URL is configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidStoreUrl`] when the URL does not parse.
    pub fn realtime_db(&self) -> Result<Option<RealtimeDbSettings>, SettingsError> {
        let Some(raw) = self.store_url.as_deref() else {
            return Ok(None);
        };
        let base_url = Url::parse(raw).map_err(|source| SettingsError::InvalidStoreUrl {
            url: raw.to_owned(),
            source,
        })?;
        Ok(Some(RealtimeDbSettings {
            base_url,
            collection: self.store_collection.clone(),
            auth_token: self.store_auth_token.clone(),
            timeout: self.store_timeout(),
        }))
    }
}
