//! HTTP inbound adapter: page, login and protected handlers plus the session
//! plumbing they share.

pub mod current_user;
pub mod error;
pub mod login;
pub mod pages;
pub mod protected;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
