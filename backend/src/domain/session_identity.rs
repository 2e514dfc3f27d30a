//! Mapping between a user record and the identity kept in a session.
//!
//! Only the user id is stored. Every request that presents a session with an
//! id performs a fresh directory lookup; nothing is cached across requests.

use std::sync::Arc;

use super::ports::UserDirectory;
use super::{Error, User, UserId};

/// Serialises users into session identities and restores them per request.
#[derive(Clone)]
pub struct SessionIdentity {
    directory: Arc<dyn UserDirectory>,
}

impl SessionIdentity {
    /// Build the identity mapper over a directory.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Reduce a user record to the reference stored in the session.
    ///
    /// # Examples
    /// ```
    /// use session_gateway::domain::{Email, PasswordHash, SessionIdentity, User, UserId};
    ///
    /// let user = User::new(
    ///     UserId::new("2f24vvg").unwrap(),
    ///     Email::new("test@test.com").unwrap(),
    ///     PasswordHash::new("hash"),
    /// );
    /// assert_eq!(SessionIdentity::serialize(&user).as_ref(), "2f24vvg");
    /// ```
    pub fn serialize(user: &User) -> UserId {
        user.id().clone()
    }

    /// Re-fetch the user referenced by a session.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::NotFound`](super::ErrorCode::NotFound) when the
    /// directory no longer holds the id, and
    /// [`ErrorCode::ServiceUnavailable`](super::ErrorCode::ServiceUnavailable)
    /// when the lookup itself fails.
    pub async fn deserialize(&self, id: &UserId) -> Result<User, Error> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} no longer exists")))
    }
}
