//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use user_service::domain::ports::UserStore;
use user_service::outbound::store::{InMemoryUserStore, RealtimeDbUserStore};
use user_service::settings::ServerSettings;

/// Everything the HTTP server needs beyond its handlers.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn UserStore>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: Arc<dyn UserStore>) -> Self {
        Self { bind_addr, store }
    }

    /// Build the configuration from loaded settings, choosing the store adapter.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the store URL is malformed or the
    /// realtime database client cannot be constructed.
    pub fn from_settings(settings: &ServerSettings) -> std::io::Result<Self> {
        let realtime_db = settings
            .realtime_db()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        let store: Arc<dyn UserStore> = match realtime_db {
            Some(db) => {
                info!(
                    store_url = %db.base_url,
                    collection = %db.collection,
                    timeout_secs = db.timeout.as_secs(),
                    "using realtime database user store"
                );
                let adapter = RealtimeDbUserStore::new(db).map_err(|err| {
                    std::io::Error::other(format!("failed to configure user store: {err}"))
                })?;
                Arc::new(adapter)
            }
            None => {
                warn!("no store URL configured; users are kept in memory");
                Arc::new(InMemoryUserStore::new())
            }
        };
        Ok(Self::new(settings.bind_addr(), store))
    }
}
