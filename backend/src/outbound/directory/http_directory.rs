//! Reqwest-backed user directory adapter.
//!
//! Owns transport details only: URL construction, status mapping and JSON
//! decoding into domain users. Each lookup is a single attempt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::UserRecordDto;
use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{Email, User, UserId};

const USERS_SEGMENT: &str = "users";
const EMAIL_QUERY_KEY: &str = "email";

/// Directory adapter issuing `GET /users?email=..` and `GET /users/<id>`.
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
}

impl HttpUserDirectory {
    /// Build an adapter for the directory rooted at `base_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let builder = Client::builder();
        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn users_url(&self, id: Option<&UserId>) -> Result<Url, UserDirectoryError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                UserDirectoryError::transport(format!(
                    "directory url {} cannot be used as a base",
                    self.base_url
                ))
            })?;
            segments.pop_if_empty().push(USERS_SEGMENT);
            if let Some(id) = id {
                segments.push(id.as_ref());
            }
        }
        Ok(url)
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<Fetched, UserDirectoryError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::NOT_FOUND {
            return Ok(Fetched::NotFound);
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(Fetched::Body(body.to_vec()))
    }
}

enum Fetched {
    NotFound,
    Body(Vec<u8>),
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserDirectoryError> {
        let url = self.users_url(None)?;
        debug!(%url, %email, "looking up user by email");
        let request = self
            .client
            .get(url)
            .query(&[(EMAIL_QUERY_KEY, email.as_ref())]);
        match self.fetch(request).await? {
            // An unknown collection is an upstream misconfiguration, not "no such user".
            Fetched::NotFound => Err(UserDirectoryError::status(
                StatusCode::NOT_FOUND.as_u16(),
                "users collection not found",
            )),
            Fetched::Body(body) => parse_first_user(&body),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        let url = self.users_url(Some(id))?;
        debug!(%url, user_id = %id, "looking up user by id");
        match self.fetch(self.client.get(url)).await? {
            Fetched::NotFound => Ok(None),
            Fetched::Body(body) => parse_user(&body).map(Some),
        }
    }
}

fn parse_first_user(body: &[u8]) -> Result<Option<User>, UserDirectoryError> {
    let records: Vec<UserRecordDto> = serde_json::from_slice(body).map_err(|error| {
        UserDirectoryError::decode(format!("expected an array of user records: {error}"))
    })?;
    records
        .into_iter()
        .next()
        .map(|record| record.into_domain().map_err(UserDirectoryError::decode))
        .transpose()
}

fn parse_user(body: &[u8]) -> Result<User, UserDirectoryError> {
    let record: UserRecordDto = serde_json::from_slice(body).map_err(|error| {
        UserDirectoryError::decode(format!("expected a user record: {error}"))
    })?;
    record.into_domain().map_err(UserDirectoryError::decode)
}

fn map_transport_error(error: reqwest::Error) -> UserDirectoryError {
    if error.is_timeout() {
        UserDirectoryError::timeout(error.to_string())
    } else {
        UserDirectoryError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UserDirectoryError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    let message = if preview.is_empty() {
        "empty body".to_owned()
    } else {
        preview
    };
    UserDirectoryError::status(status.as_u16(), message)
}
