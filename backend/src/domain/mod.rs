//! Domain primitives, validation, and use-cases.
//!
//! Purpose: keep the user resource's rules free of transport and storage
//! concerns. Inbound adapters validate requests through
//! [`user_validation`] and drive [`UserService`] through the ports in
//! [`ports`]; outbound adapters implement [`ports::UserStore`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `UserId`, `UserRecord`, `NewUser`, `UserChanges`, `UserUpdate`.
//! - `UserService`: create, list, update, delete over an injected store.
//! - `TraceId`: request-scoped correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod user_validation;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, User, UserChanges, UserField, UserId, UserRecord, UserUpdate};
pub use self::user_service::UserService;
pub use self::user_validation::{FieldError, FieldErrorKind, ValidationErrors};
