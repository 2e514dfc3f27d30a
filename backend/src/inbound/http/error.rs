//! Generic error handler for the HTTP adapter.
//!
//! Handlers propagate the domain [`Error`]; this module turns it into a JSON
//! body whose status follows the error code. Internal failures are logged in
//! full and answered with a fixed message. Only the failing request is
//! affected.

use std::borrow::Cow;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result type returned by fallible handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";

fn http_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Payload safe to send to the client.
///
/// Internal errors keep only their trace id; everything else is sent as is.
fn client_view(err: &Error) -> Cow<'_, Error> {
    if err.code() != ErrorCode::InternalError {
        return Cow::Borrowed(err);
    }
    let opaque = Error::new(ErrorCode::InternalError, INTERNAL_MESSAGE);
    Cow::Owned(match err.trace_id() {
        Some(trace_id) => opaque.with_trace_id(trace_id),
        None => opaque,
    })
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        http_status(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(trace_id = ?self.trace_id(), error = %self, "request failed");
        }
        let mut response = HttpResponse::build(self.status_code());
        if let Some(trace_id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, trace_id));
        }
        response.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced in handler");
        Self::new(ErrorCode::InternalError, INTERNAL_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
