//! User resource handlers.
//!
//! ```text
//! POST   /user/ {"name":"Ann","location":"NYC"}
//! GET    /user/
//! PUT    /user/ {"user_id":"-Nabc","update_data":{"location":"Paris"}}
//! DELETE /user/ {"user_id":"-Nabc"}
//! ```
//!
//! Create and update are validated before any store call. Delete is not
//! validated and always reports success once the store accepts the removal.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Resource, web};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::user_validation::{validate_create, validate_update};
use crate::domain::{NewUser, UserId, UserUpdate, ValidationErrors};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::state::HttpState;

/// Paths served by the user resource; the trailing slash is optional.
pub const USER_PATHS: [&str; 2] = ["/user/", "/user"];

/// Resource routing every user operation by HTTP method.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::users::user_resource;
///
/// let app = App::new().service(user_resource());
/// # let _ = app;
/// ```
pub fn user_resource() -> Resource {
    web::resource(USER_PATHS)
        .route(web::post().to(create_user))
        .route(web::get().to(list_users))
        .route(web::put().to(update_user))
        .route(web::delete().to(delete_user))
}

/// Keep an explicit `null` as `Some(Value::Null)`; only an absent member is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Request body for `POST /user/`.
///
/// Members stay raw JSON so type problems are reported under the field name
/// rather than as an unreadable body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "Ann")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "NYC")]
    pub location: Option<Value>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<NewUser, ValidationErrors> {
        validate_create(self.name.as_ref(), self.location.as_ref())
    }
}

/// Request body for `PUT /user/`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "-NpQ2t0Zk1f0a9XyB3cD")]
    pub user_id: Option<Value>,
    /// Partial record; keys limited to `name` and `location`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub update_data: Option<Value>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<UserUpdate, ValidationErrors> {
        validate_update(self.user_id.as_ref(), self.update_data.as_ref())
    }
}

/// Request body for `DELETE /user/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteUserRequest {
    #[schema(example = "-NpQ2t0Zk1f0a9XyB3cD")]
    pub user_id: String,
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/user/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created; `response` holds the stored user", body = Envelope),
        (status = 400, description = "Invalid data provided", body = Envelope),
        (status = 500, description = "Internal server error", body = Envelope)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = payload.validate()?;
    let user = state.users.create_user(new_user).await?;
    Ok(Envelope::success("User created successfully.")
        .with_response(&user)?
        .respond(StatusCode::CREATED))
}

/// List every stored user, ordered by identifier.
#[utoipa::path(
    get,
    path = "/user/",
    responses(
        (status = 200, description = "`response` holds the users", body = Envelope),
        (status = 500, description = "Internal server error", body = Envelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users_query.list_users().await?;
    Ok(Envelope::success("Users fetched successfully.")
        .with_response(&users)?
        .respond(StatusCode::OK))
}

/// Apply a partial update to one user.
///
/// The store's acknowledgment is returned verbatim; the user is not checked
/// for existence first.
#[utoipa::path(
    put,
    path = "/user/",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "`response` holds the store acknowledgment", body = Envelope),
        (status = 400, description = "Invalid data provided", body = Envelope),
        (status = 500, description = "Internal server error", body = Envelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
pub async fn update_user(
    state: web::Data<HttpState>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let update = payload.validate()?;
    let ack = state.users.update_user(update).await?;
    Ok(Envelope::success("User updated successfully.")
        .with_response(&ack)?
        .respond(StatusCode::OK))
}

/// Remove one user. Succeeds whether or not the identifier exists.
#[utoipa::path(
    delete,
    path = "/user/",
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "User deleted", body = Envelope),
        (status = 400, description = "Unreadable request body", body = Envelope),
        (status = 500, description = "Internal server error", body = Envelope)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
pub async fn delete_user(
    state: web::Data<HttpState>,
    payload: web::Json<DeleteUserRequest>,
) -> ApiResult<HttpResponse> {
    let DeleteUserRequest { user_id } = payload.into_inner();
    state.users.delete_user(&UserId::new(user_id)).await?;
    Ok(Envelope::success("User deleted successfully.").respond(StatusCode::OK))
}
