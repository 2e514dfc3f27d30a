//! Driven port for the external user directory.
//!
//! The directory owns user records; the gateway only reads them. Two lookups
//! are needed: by email when logging in and by id when restoring a session.

use async_trait::async_trait;
use tracing::error;

use super::define_port_error;
use crate::domain::{Email, Error, User, UserId};

define_port_error! {
    /// Errors surfaced while talking to the user directory.
    pub enum UserDirectoryError {
        /// The request never produced a response.
        Transport { message: String } =>
            "user directory transport failed: {message}",
        /// The directory did not answer in time.
        Timeout { message: String } =>
            "user directory timed out: {message}",
        /// The directory answered with an unexpected status.
        Status { status: u16, message: String } =>
            "user directory returned status {status}: {message}",
        /// The response body could not be decoded into a user record.
        Decode { message: String } =>
            "user directory response decode failed: {message}",
    }
}

impl From<UserDirectoryError> for Error {
    fn from(err: UserDirectoryError) -> Self {
        // The cause may carry upstream URLs or payload fragments; keep it in logs.
        error!(error = %err, "user directory lookup failed");
        Error::service_unavailable("user directory unavailable")
    }
}

/// Port for reading user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the first record whose email matches, if any.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserDirectoryError>;

    /// Return the record with the given id, if it still exists.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError>;
}

/// In-memory directory used by tests and local tooling.
///
/// # Examples
/// ```
/// use session_gateway::domain::ports::{FixtureUserDirectory, UserDirectory};
/// use session_gateway::domain::{Email, PasswordHash, User, UserId};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let user = User::new(
///     UserId::new("2f24vvg").unwrap(),
///     Email::new("test@test.com").unwrap(),
///     PasswordHash::new("$argon2id$..."),
/// );
/// let directory = FixtureUserDirectory::new(vec![user.clone()]);
/// let found = directory.find_by_id(user.id()).await.unwrap();
/// assert_eq!(found, Some(user));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureUserDirectory {
    users: Vec<User>,
}

impl FixtureUserDirectory {
    /// Build a directory holding exactly these records.
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserDirectoryError> {
        Ok(self.users.iter().find(|user| user.email() == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(self.users.iter().find(|user| user.id() == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, PasswordHash};
    use rstest::{fixture, rstest};

    #[fixture]
    fn directory() -> FixtureUserDirectory {
        FixtureUserDirectory::new(vec![
            User::new(
                UserId::new("1").expect("id"),
                Email::new("first@test.com").expect("email"),
                PasswordHash::new("h1"),
            ),
            User::new(
                UserId::new("2").expect("id"),
                Email::new("second@test.com").expect("email"),
                PasswordHash::new("h2"),
            ),
        ])
    }

    #[rstest]
    #[tokio::test]
    async fn finds_records_by_email_and_id(directory: FixtureUserDirectory) {
        let email = Email::new("second@test.com").expect("email");
        let by_email = directory
            .find_by_email(&email)
            .await
            .expect("lookup")
            .expect("record");
        assert_eq!(by_email.id().as_ref(), "2");

        let by_id = directory
            .find_by_id(by_email.id())
            .await
            .expect("lookup")
            .expect("record");
        assert_eq!(by_id, by_email);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_keys_are_not_found(directory: FixtureUserDirectory) {
        let email = Email::new("nobody@test.com").expect("email");
        assert!(directory.find_by_email(&email).await.expect("lookup").is_none());
        let id = UserId::new("99").expect("id");
        assert!(directory.find_by_id(&id).await.expect("lookup").is_none());
    }

    #[rstest]
    #[case(UserDirectoryError::transport("connection refused"))]
    #[case(UserDirectoryError::timeout("deadline elapsed"))]
    #[case(UserDirectoryError::status(500_u16, "boom"))]
    #[case(UserDirectoryError::decode("expected array"))]
    fn directory_errors_map_to_service_unavailable(#[case] err: UserDirectoryError) {
        let mapped = Error::from(err);
        assert_eq!(mapped.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(mapped.message(), "user directory unavailable");
    }
}
