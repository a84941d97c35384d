//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while rendering every
//! failure, including malformed request bodies, as the shared envelope.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::warn;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, ValidationErrors};
use crate::inbound::http::envelope::Envelope;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message attached to every 400 response.
pub const INVALID_DATA_MESSAGE: &str = "Invalid data provided";

/// Message attached to every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Key under which body parsing failures are reported in `errors`.
pub const BODY_FIELD: &str = "body";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn envelope_for(error: &Error) -> Envelope {
    let envelope = match error.code() {
        ErrorCode::InvalidRequest => {
            Envelope::failure(error.message(), error.details().cloned())
        }
        ErrorCode::InternalError => Envelope::failure(INTERNAL_ERROR_MESSAGE, None),
    };
    envelope.with_trace_id(error.trace_id())
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(envelope_for(self))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        warn!(fields = %errors, "request rejected by validation");
        Error::invalid_request(INVALID_DATA_MESSAGE).with_details(errors.to_json())
    }
}

/// `JsonConfig` error handler reporting unreadable bodies as validation failures.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use user_service::inbound::http::error::json_error_handler;
///
/// let config = web::JsonConfig::default().error_handler(json_error_handler);
/// # let _ = config;
/// ```
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "request body rejected");
    Error::invalid_request(INVALID_DATA_MESSAGE)
        .with_details(json!({ BODY_FIELD: [err.to_string()] }))
        .into()
}
