//! Driven port for comparing a plaintext password against a stored hash.

use super::define_port_error;
use crate::domain::PasswordHash;

define_port_error! {
    /// Errors raised while verifying a password.
    pub enum PasswordVerifierError {
        /// The stored hash could not be parsed by the verifier.
        MalformedHash { message: String } =>
            "stored password hash is malformed: {message}",
    }
}

/// Port for credential verification.
///
/// Implementations return `Ok(false)` for a well-formed hash that does not
/// match; errors are reserved for hashes the verifier cannot interpret.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync {
    /// Compare `password` with `hash`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordVerifierError>;
}
