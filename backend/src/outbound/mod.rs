//! Outbound adapters implementing domain ports and storage seams.
//!
//! - `directory`: reqwest client for the external user directory.
//! - `password`: Argon2 credential verifier.
//! - `session_store`: file-backed `actix-session` store.

pub mod directory;
pub mod password;
pub mod session_store;
