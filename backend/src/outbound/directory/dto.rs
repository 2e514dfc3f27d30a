//! Wire format of directory user records.

use serde::Deserialize;

use crate::domain::{Email, PasswordHash, User, UserId};

/// Record ids arrive as strings or, from some directory backends, numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawUserId {
    Text(String),
    Number(u64),
}

impl RawUserId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// One user record as served by the directory.
#[derive(Debug, Deserialize)]
pub(super) struct UserRecordDto {
    pub(super) id: RawUserId,
    pub(super) email: String,
    pub(super) password: String,
}

impl UserRecordDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let id = UserId::new(self.id.into_string()).map_err(|err| err.to_string())?;
        let email = Email::new(&self.email).map_err(|err| err.to_string())?;
        Ok(User::new(id, email, PasswordHash::new(self.password)))
    }
}
