//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod authentication_strategy;
mod password_verifier;
mod user_directory;

#[cfg(test)]
pub use authentication_strategy::MockAuthenticationStrategy;
pub use authentication_strategy::AuthenticationStrategy;
#[cfg(test)]
pub use password_verifier::MockPasswordVerifier;
pub use password_verifier::{PasswordVerifier, PasswordVerifierError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
