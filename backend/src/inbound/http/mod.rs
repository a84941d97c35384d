//! HTTP inbound adapter exposing REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod state;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register every endpoint and the JSON body error handler.
///
/// Handlers expect [`state::HttpState`] and [`health::HealthState`] in app data.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use user_service::inbound::http::{self, health::HealthState, state::HttpState};
/// use user_service::outbound::store::InMemoryUserStore;
///
/// let state = HttpState::from_store(Arc::new(InMemoryUserStore::new()));
/// let app = App::new()
///     .app_data(web::Data::new(state))
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(http::configure);
/// # let _ = app;
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(health::service_info)
        .service(health::health_check)
        .service(health::ready)
        .service(health::live)
        .service(users::user_resource());
}
