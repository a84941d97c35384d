//! Service info and health endpoints.
//!
//! ```text
//! GET /              service banner
//! GET /health        static "server is up" check
//! GET /health/ready  readiness probe (503 until the listener is bound)
//! GET /health/live   liveness probe (503 once draining)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, web};

use crate::inbound::http::envelope::Envelope;

pub const SERVICE_INFO_MESSAGE: &str = "Welcome to our API service.";
pub const HEALTH_CHECK_MESSAGE: &str = "If you are seeing this, the server is up.";

/// Shared readiness and liveness flags.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool, ok_message: &str, failed_message: &str) -> HttpResponse {
        let (status, envelope) = if probe_ok {
            (StatusCode::OK, Envelope::success(ok_message))
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Envelope::failure(failed_message, None),
            )
        };

        HttpResponse::build(status)
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(envelope)
    }
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    responses((status = 200, description = "Service banner", body = Envelope)),
    operation_id = "serviceInfo"
)]
#[get("/")]
pub async fn service_info() -> HttpResponse {
    Envelope::success(SERVICE_INFO_MESSAGE).respond(StatusCode::OK)
}

/// Static health check; answering at all means the server is up.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses((status = 200, description = "Server is up", body = Envelope)),
    operation_id = "healthCheck"
)]
#[get("/health")]
pub async fn health_check() -> HttpResponse {
    Envelope::success(HEALTH_CHECK_MESSAGE).respond(StatusCode::OK)
}

/// Readiness probe. Return 200 once the server has bound its listener, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = Envelope),
        (status = 503, description = "Server is not ready", body = Envelope)
    ),
    operation_id = "readiness"
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready(), "Service is ready.", "Service is not ready.")
}

/// Liveness probe. Return 200 while the process is marked alive and 503 once draining.
/// Call `HealthState::mark_unhealthy` before graceful shutdown to surface the drain early.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive", body = Envelope),
        (status = 503, description = "Server is shutting down", body = Envelope)
    ),
    operation_id = "liveness"
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(
        state.is_alive(),
        "Service is alive.",
        "Service is shutting down.",
    )
}
