//! Email/password strategy backed by the user directory.
//!
//! One lookup by email, then one hash comparison. No retries: a directory
//! fault ends the attempt with an error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::ports::{AuthenticationStrategy, PasswordVerifier, UserDirectory};
use super::{AuthFailure, AuthOutcome, AuthResult, Error, LoginCredentials};

/// Local credential strategy.
#[derive(Clone)]
pub struct LocalStrategy {
    directory: Arc<dyn UserDirectory>,
    verifier: Arc<dyn PasswordVerifier>,
}

impl LocalStrategy {
    /// Build a strategy from its two collaborators.
    pub fn new(directory: Arc<dyn UserDirectory>, verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self {
            directory,
            verifier,
        }
    }
}

#[async_trait]
impl AuthenticationStrategy for LocalStrategy {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn verify(&self, credentials: &LoginCredentials) -> AuthResult {
        let Some(user) = self.directory.find_by_email(credentials.email()).await? else {
            debug!(email = %credentials.email(), "no directory record for email");
            return Ok(AuthOutcome::Failure(AuthFailure::UnknownEmail));
        };

        let matches = self
            .verifier
            .verify(credentials.password(), user.password_hash())
            .map_err(|err| {
                error!(error = %err, user_id = %user.id(), "password verification failed");
                Error::internal("password verification failed")
            })?;

        if matches {
            debug!(user_id = %user.id(), "credentials accepted");
            Ok(AuthOutcome::Success(user))
        } else {
            debug!(user_id = %user.id(), "password mismatch");
            Ok(AuthOutcome::Failure(AuthFailure::WrongPassword))
        }
    }
}
