//! Login handler.
//!
//! ```text
//! POST /login email=test@test.com&password=password
//! POST /login {"email":"test@test.com","password":"password"}
//! ```
//!
//! Rejected credentials are answered with `200` and a plain-text reason.
//! Lookup faults go through the generic error handler. A successful login
//! stores the user id in the session and redirects to `/authrequired`.

use actix_web::http::header::{self, ContentType};
use actix_web::{Either, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{AuthFailure, AuthOutcome, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::protected::AUTH_REQUIRED_PATH;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body, accepted as a form or as JSON.
///
/// Missing fields deserialise as empty strings and are reported as missing
/// credentials.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginRequest {
    /// Account email, matched against the directory.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

type LoginPayload = Either<web::Form<LoginRequest>, web::Json<LoginRequest>>;

/// Authenticate the submitted credentials and establish a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Result<LoginPayload, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let request = match payload {
        Ok(Either::Left(form)) => form.into_inner(),
        Ok(Either::Right(json)) => json.into_inner(),
        Err(error) => {
            debug!(%error, "login body not readable; treating as empty");
            LoginRequest::default()
        }
    };
    let credentials = match LoginCredentials::try_from(request) {
        Ok(credentials) => credentials,
        Err(error) => return Ok(rejected(AuthFailure::from(error))),
    };

    match state.strategy.verify(&credentials).await? {
        AuthOutcome::Failure(failure) => {
            info!(
                strategy = state.strategy.name(),
                email = %credentials.email(),
                reason = failure.reason(),
                "login rejected"
            );
            Ok(rejected(failure))
        }
        AuthOutcome::Success(user) => {
            session.persist_user(&user)?;
            info!(strategy = state.strategy.name(), user_id = %user.id(), "login succeeded");
            Ok(HttpResponse::Found()
                .insert_header((header::LOCATION, AUTH_REQUIRED_PATH))
                .finish())
        }
    }
}

fn rejected(failure: AuthFailure) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(failure.message())
}

#[cfg(test)]
mod tests;
