//! Password verification for directory records.
//!
//! Records normally store bcrypt strings (`$2a$`, `$2b$` or `$2y$`). PHC
//! Argon2 strings (`$argon2id$v=19$...`) are accepted as well. The format is
//! picked from the hash prefix and the cost is read from the hash itself, so
//! records hashed with different settings verify with the same verifier.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash as PhcHash, PasswordHasher, PasswordVerifier as _, SaltString,
};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordVerifier, PasswordVerifierError};

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Verifies plaintext passwords against bcrypt or Argon2 PHC strings.
#[derive(Debug, Clone, Default)]
pub struct DirectoryPasswordVerifier {
    argon2: Argon2<'static>,
}

impl DirectoryPasswordVerifier {
    /// Verifier using a specific Argon2 context, e.g. cheaper parameters for
    /// fixtures.
    pub fn with_context(argon2: Argon2<'static>) -> Self {
        Self { argon2 }
    }

    /// Hash `password` as an Argon2 PHC string with a random salt.
    ///
    /// Used to seed fixture directories; the gateway itself never hashes.
    ///
    /// # Errors
    ///
    /// Propagates hashing failures from the `password-hash` crate.
    pub fn hash(&self, password: &str) -> Result<PasswordHash, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(PasswordHash::new(hash.to_string()))
    }

    fn verify_phc(&self, password: &str, stored: &str) -> Result<bool, PasswordVerifierError> {
        let parsed = PhcHash::new(stored)
            .map_err(|err| PasswordVerifierError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordVerifierError::malformed_hash(err.to_string())),
        }
    }
}

fn is_bcrypt(stored: &str) -> bool {
    BCRYPT_PREFIXES
        .iter()
        .any(|prefix| stored.starts_with(prefix))
}

impl PasswordVerifier for DirectoryPasswordVerifier {
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordVerifierError> {
        let stored = hash.as_ref();
        if is_bcrypt(stored) {
            bcrypt::verify(password, stored)
                .map_err(|err| PasswordVerifierError::malformed_hash(err.to_string()))
        } else {
            self.verify_phc(password, stored)
        }
    }
}
