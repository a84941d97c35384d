//! Uniform JSON envelope wrapping every HTTP response body.
//!
//! ```text
//! {"success": true,  "message": "...", "response": <payload>}
//! {"success": false, "message": "...", "errors": {"field": ["..."]}}
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::Error;

/// Response body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    #[schema(example = "Users fetched successfully.")]
    pub message: String,
    /// Operation payload; omitted when the operation has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub response: Option<Value>,
    /// Field name to messages, present on validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<Value>,
    /// Request trace identifier, present on failures raised inside a traced request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Envelope {
    /// Successful envelope without a payload.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            response: None,
            errors: None,
            trace_id: None,
        }
    }

    /// Failed envelope carrying optional validation detail.
    pub fn failure(message: impl Into<String>, errors: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            response: None,
            errors,
            trace_id: None,
        }
    }

    /// Attach a serialisable payload as `response`.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the payload cannot be encoded as JSON.
    pub fn with_response<T: Serialize>(mut self, payload: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(payload)
            .map_err(|err| Error::internal(format!("failed to encode response: {err}")))?;
        self.response = Some(value);
        Ok(self)
    }

    pub fn with_trace_id(mut self, trace_id: Option<&str>) -> Self {
        self.trace_id = trace_id.map(str::to_owned);
        self
    }

    /// Render the envelope with the given status code.
    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}
