//! Coverage for the generic error handler.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::TraceId;

const TRACE_ID: &str = "7b0c6a42-5f0e-4d55-9a53-0e3b8a1f2c11";

struct Rendered {
    status: StatusCode,
    trace_header: Option<String>,
    payload: Error,
}

async fn render(error: &Error) -> Rendered {
    let response = error.error_response();
    let status = response.status();
    let trace_header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii trace id").to_owned());
    let bytes = to_bytes(response.into_body()).await.expect("read body");
    let payload = serde_json::from_slice(&bytes).expect("error payload");
    Rendered {
        status,
        trace_header,
        payload,
    }
}

#[rstest]
#[case(Error::not_found("no such record"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("directory down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("disk full"), StatusCode::INTERNAL_SERVER_ERROR)]
fn codes_map_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(error.status_code(), expected);
}

#[rstest]
#[actix_web::test]
async fn internal_details_never_leave_the_process() {
    let error = Error::internal("stored password hash is malformed")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "hash": "$2a$10$..." }));

    let rendered = render(&error).await;

    assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rendered.trace_header.as_deref(), Some(TRACE_ID));
    assert_eq!(rendered.payload.message(), "Internal server error");
    assert_eq!(rendered.payload.trace_id(), Some(TRACE_ID));
    assert!(rendered.payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn upstream_failures_are_reported_verbatim() {
    let error = Error::service_unavailable("user directory unavailable")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "status": 502 }));

    let rendered = render(&error).await;

    assert_eq!(rendered.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(rendered.payload, error);
}

#[rstest]
#[actix_web::test]
async fn untraced_errors_have_no_trace_header() {
    let rendered = render(&Error::not_found("gone")).await;

    assert!(rendered.trace_header.is_none());
    assert_eq!(rendered.payload.code(), ErrorCode::NotFound);
}

#[rstest]
#[actix_web::test]
async fn errors_built_in_a_trace_scope_are_tagged() {
    let trace_id: TraceId = TRACE_ID.parse().expect("uuid");
    let error = TraceId::scope(trace_id, async { Error::service_unavailable("timeout") }).await;

    let rendered = render(&error).await;

    assert_eq!(rendered.trace_header.as_deref(), Some(TRACE_ID));
}

#[rstest]
fn framework_errors_become_opaque_internal_errors() {
    let error: Error = actix_web::error::ErrorBadRequest("payload too large").into();

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Internal server error");
    assert!(error.details().is_none());
}
