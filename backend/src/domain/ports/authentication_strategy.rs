//! Driving port for credential strategies.
//!
//! Handlers only know this trait, so further credential schemes can be added
//! without touching the session plumbing.

use async_trait::async_trait;

use crate::domain::{AuthResult, LoginCredentials};

/// A credential scheme able to turn login input into an [`AuthResult`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthenticationStrategy: Send + Sync {
    /// Short identifier used in logs, e.g. `local`.
    fn name(&self) -> &'static str;

    /// Verify credentials. Lookup faults are returned as `Err`; rejections
    /// are `Ok(AuthOutcome::Failure(..))`.
    async fn verify(&self, credentials: &LoginCredentials) -> AuthResult;
}
