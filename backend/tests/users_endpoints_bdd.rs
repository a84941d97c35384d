//! Behavioural tests for the user resource and its response envelope.
//!
//! Each request builds the production service configuration on an actix
//! `SystemRunner`, so the handlers, JSON error handler, and trace middleware
//! are exercised together against an in-memory or failing store.

use std::collections::BTreeMap;
use std::sync::Arc;

use actix_rt::SystemRunner;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use user_service::Trace;
use user_service::domain::ports::{UserStore, UserStoreError};
use user_service::domain::{NewUser, TRACE_ID_HEADER, UserChanges, UserId, UserRecord};
use user_service::inbound::http::{self, health::HealthState, state::HttpState};
use user_service::outbound::store::InMemoryUserStore;

const USER_PATH: &str = "/user/";

/// Store whose every call fails as if the database were unreachable.
struct UnreachableUserStore;

#[async_trait]
impl UserStore for UnreachableUserStore {
    async fn insert(&self, _user: &NewUser) -> Result<UserId, UserStoreError> {
        Err(UserStoreError::connection("db.internal refused"))
    }

    async fn fetch_all(&self) -> Result<BTreeMap<UserId, UserRecord>, UserStoreError> {
        Err(UserStoreError::connection("db.internal refused"))
    }

    async fn update_child(
        &self,
        _id: &UserId,
        _changes: &UserChanges,
    ) -> Result<Value, UserStoreError> {
        Err(UserStoreError::connection("db.internal refused"))
    }

    async fn remove_child(&self, _id: &UserId) -> Result<(), UserStoreError> {
        Err(UserStoreError::connection("db.internal refused"))
    }
}

struct Reply {
    status: u16,
    body: Value,
    trace_id: Option<String>,
}

struct UsersWorld {
    system: SystemRunner,
    memory: Arc<InMemoryUserStore>,
    store: Arc<dyn UserStore>,
    replies: Vec<Reply>,
}

impl UsersWorld {
    fn send(&mut self, request: actix_test::TestRequest) {
        let state = HttpState::from_store(self.store.clone());
        let reply = self.system.block_on(async move {
            let app = actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .app_data(web::Data::new(HealthState::new()))
                    .configure(http::configure)
                    .wrap(Trace),
            )
            .await;
            let response = actix_test::call_service(&app, request.to_request()).await;
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body: Value = actix_test::read_body_json(response).await;
            Reply {
                status,
                body,
                trace_id,
            }
        });
        self.replies.push(reply);
    }

    fn last(&self) -> &Reply {
        self.replies.last().expect("a request should have been sent")
    }

    fn stored(&self, id: &str) -> Option<UserRecord> {
        let memory = self.memory.clone();
        let id = UserId::new(id);
        self.system.block_on(async move { memory.get(&id).await })
    }
}

#[fixture]
fn world() -> UsersWorld {
    let memory = Arc::new(InMemoryUserStore::new());
    UsersWorld {
        system: actix_rt::System::new(),
        store: memory.clone(),
        memory,
        replies: Vec::new(),
    }
}

#[given("an empty user store")]
fn an_empty_user_store(world: &mut UsersWorld) {
    assert!(world.stored("legacy").is_none());
}

#[given("a stored user {id} named {name} without a location")]
fn a_stored_user_without_a_location(world: &mut UsersWorld, id: String, name: String) {
    let memory = Arc::new(InMemoryUserStore::with_records([(
        UserId::new(id),
        UserRecord {
            name: Some(name),
            location: None,
        },
    )]));
    world.store = memory.clone();
    world.memory = memory;
}

#[given("the user store is unavailable")]
fn the_user_store_is_unavailable(world: &mut UsersWorld) {
    world.store = Arc::new(UnreachableUserStore);
}

#[when("the client creates a user named {name} in {location}")]
fn the_client_creates_a_user(world: &mut UsersWorld, name: String, location: String) {
    world.send(
        actix_test::TestRequest::post()
            .uri(USER_PATH)
            .set_json(json!({"name": name, "location": location})),
    );
}

#[when("the client submits a user without a location named {name}")]
fn the_client_submits_a_user_without_a_location(world: &mut UsersWorld, name: String) {
    world.send(
        actix_test::TestRequest::post()
            .uri(USER_PATH)
            .set_json(json!({"name": name})),
    );
}

#[when("the client lists users")]
fn the_client_lists_users(world: &mut UsersWorld) {
    world.send(actix_test::TestRequest::get().uri(USER_PATH));
}

#[when("the client sets {field} to {value} on user {id}")]
fn the_client_sets_a_field(world: &mut UsersWorld, field: String, value: String, id: String) {
    world.send(
        actix_test::TestRequest::put()
            .uri(USER_PATH)
            .set_json(json!({"user_id": id, "update_data": {field: value}})),
    );
}

#[when("the client deletes user {id} twice")]
fn the_client_deletes_a_user_twice(world: &mut UsersWorld, id: String) {
    for _ in 0..2 {
        world.send(
            actix_test::TestRequest::delete()
                .uri(USER_PATH)
                .set_json(json!({"user_id": id})),
        );
    }
}

#[when("the client sends a malformed create request")]
fn the_client_sends_a_malformed_create_request(world: &mut UsersWorld) {
    world.send(
        actix_test::TestRequest::post()
            .uri(USER_PATH)
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": \"Ann\","),
    );
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &mut UsersWorld, status: u16) {
    assert_eq!(world.last().status, status, "body: {}", world.last().body);
}

#[then("the response reports success")]
fn the_response_reports_success(world: &mut UsersWorld) {
    assert_eq!(world.last().body["success"], json!(true));
}

#[then("the created user is {name} in {location} with a generated id")]
fn the_created_user_is(world: &mut UsersWorld, name: String, location: String) {
    let created = &world.last().body["response"];
    assert_eq!(created["name"], json!(name));
    assert_eq!(created["location"], json!(location));
    let id = created["_id"].as_str().expect("id is a string");
    assert!(!id.is_empty());
    assert!(world.stored(id).is_some(), "created user is persisted");
}

#[then("the response carries a trace id")]
fn the_response_carries_a_trace_id(world: &mut UsersWorld) {
    let trace_id = world.last().trace_id.as_deref().expect("trace-id header");
    assert!(!trace_id.is_empty());
}

#[then("the errors mention {field}")]
fn the_errors_mention(world: &mut UsersWorld, field: String) {
    let body = &world.last().body;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid data provided"));
    let errors = body["errors"].to_string();
    assert!(errors.contains(&field), "errors {errors} should mention {field}");
}

#[then("the user store holds {count} users")]
fn the_user_store_holds(world: &mut UsersWorld, count: usize) {
    let memory = world.memory.clone();
    let len = world.system.block_on(async move { memory.len().await });
    assert_eq!(len, count);
}

#[then("the listed users are empty")]
fn the_listed_users_are_empty(world: &mut UsersWorld) {
    assert_eq!(world.last().body["response"], json!([]));
}

#[then("the listed user {id} has an empty location")]
fn the_listed_user_has_an_empty_location(world: &mut UsersWorld, id: String) {
    let users = world.last().body["response"]
        .as_array()
        .expect("response is a list");
    let user = users
        .iter()
        .find(|user| user["_id"] == json!(id))
        .expect("listed user present");
    assert_eq!(user["location"], json!(""));
}

#[then("the stored user {id} is {name} in {location}")]
fn the_stored_user_is(world: &mut UsersWorld, id: String, name: String, location: String) {
    let record = world.stored(&id).expect("record present");
    assert_eq!(record.name.as_deref(), Some(name.as_str()));
    assert_eq!(record.location.as_deref(), Some(location.as_str()));
}

#[then("both deletions succeed")]
fn both_deletions_succeed(world: &mut UsersWorld) {
    assert_eq!(world.replies.len(), 2);
    for reply in &world.replies {
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["message"], json!("User deleted successfully."));
    }
}

#[then("the response message is the generic internal error")]
fn the_response_message_is_the_generic_internal_error(world: &mut UsersWorld) {
    let body = &world.last().body;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Internal server error"));
    assert!(body.get("errors").is_none());
    assert!(!body.to_string().contains("db.internal"));
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Creating a user returns the stored record"
)]
fn creating_a_user_returns_the_stored_record(world: UsersWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Creating a user without a location is rejected"
)]
fn creating_a_user_without_a_location_is_rejected(world: UsersWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Listing an empty store returns an empty list"
)]
fn listing_an_empty_store_returns_an_empty_list(world: UsersWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Listing tolerates partially populated records"
)]
fn listing_tolerates_partially_populated_records(world: UsersWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Updating with an unknown key is rejected"
)]
fn updating_with_an_unknown_key_is_rejected(world: UsersWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Updating a stored user merges the change"
)]
fn updating_a_stored_user_merges_the_change(world: UsersWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Deleting the same user twice succeeds both times"
)]
fn deleting_the_same_user_twice_succeeds_both_times(world: UsersWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Store failures are reported without detail"
)]
fn store_failures_are_reported_without_detail(world: UsersWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/users_endpoints.feature",
    name = "Malformed bodies are rejected as invalid data"
)]
fn malformed_bodies_are_rejected_as_invalid_data(world: UsersWorld) {
    drop(world);
}
