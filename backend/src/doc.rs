//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the envelope and request schemas. The document is served by Swagger UI
//! in debug builds and exported via `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::User;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::users::{CreateUserRequest, DeleteUserRequest, UpdateUserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User service API",
        description = "CRUD operations over users held in a remote document store, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::service_info,
        crate::inbound::http::health::health_check,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
    ),
    components(schemas(
        Envelope,
        User,
        CreateUserRequest,
        UpdateUserRequest,
        DeleteUserRequest
    )),
    tags(
        (name = "users", description = "Operations on the user resource"),
        (name = "health", description = "Service info and health probes")
    )
)]
pub struct ApiDoc;
