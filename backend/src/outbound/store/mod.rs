//! User store adapters.
//!
//! - [`InMemoryUserStore`]: process-local map, used for local runs and tests.
//! - [`RealtimeDbUserStore`]: REST client for a Firebase-style realtime
//!   document database.

mod memory;
mod realtime_db;

pub use memory::InMemoryUserStore;
pub use realtime_db::{RealtimeDbSettings, RealtimeDbUserStore};
