//! Session gateway library modules.
//!
//! Email/password login against an HTTP user directory, with server-side
//! sessions kept in a file-backed store. `main.rs` only reads configuration
//! and calls [`server::create_server`].

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
