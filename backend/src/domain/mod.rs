//! Domain primitives, services and ports.
//!
//! Purpose: keep authentication and session-identity rules independent of
//! Actix, reqwest and the filesystem. Adapters in `inbound` and `outbound`
//! depend on this module, never the other way round.
//!
//! Public surface:
//! - `User`, `UserId`, `Email`, `PasswordHash`: directory record types.
//! - `LoginCredentials`, `AuthFailure`, `AuthOutcome`, `AuthResult`: login
//!   input and strategy outcomes.
//! - `LocalStrategy`: email/password strategy.
//! - `SessionIdentity`: serialise/deserialise of the session user.
//! - `Error`, `ErrorCode`, `TraceId`: error payload and correlation id.

pub mod auth;
pub mod error;
pub mod local_strategy;
pub mod ports;
pub mod session_identity;
pub mod trace_id;
pub mod user;

pub use self::auth::{AuthFailure, AuthOutcome, AuthResult, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::local_strategy::LocalStrategy;
pub use self::session_identity::SessionIdentity;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, PasswordHash, User, UserId, UserValidationError};
