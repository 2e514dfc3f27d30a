//! Marks brand-new sessions as changed so they are always persisted.
//!
//! `actix-session` only writes state that a handler modified. Stamping an
//! empty session with `issued_at` makes every first visit produce a stored
//! record and a session cookie, even on routes that never touch the session.
//! Must be registered inside `SessionMiddleware` (i.e. `.wrap`ped before it).

use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use chrono::{SecondsFormat, Utc};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

/// Session key stamped onto sessions created by this request.
pub const ISSUED_AT_KEY: &str = "issued_at";

/// Middleware persisting uninitialised sessions.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use session_gateway::middleware::SessionTracking;
///
/// let app = App::new().wrap(SessionTracking);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionTracking;

impl<S, B> Transform<S, ServiceRequest> for SessionTracking
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionTrackingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionTrackingMiddleware { service }))
    }
}

/// Service wrapper produced by [`SessionTracking`].
pub struct SessionTrackingMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionTrackingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = req.get_session();
        if session.entries().is_empty() {
            let issued_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            match session.insert(ISSUED_AT_KEY, &issued_at) {
                Ok(()) => debug!(%issued_at, "new session issued"),
                Err(error) => warn!(%error, "failed to stamp new session"),
            }
        }
        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::TestSessions;
    use actix_session::Session;
    use actix_web::{HttpResponse, test, web};

    #[actix_web::test]
    async fn first_request_gets_a_persisted_session() {
        let sessions = TestSessions::new();
        let app = test::init_service(
            sessions
                .app()
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert!(res.response().cookies().any(|c| c.name() == "session"));
        assert_eq!(sessions.record_count(), 1);
    }

    #[actix_web::test]
    async fn existing_sessions_keep_their_stamp() {
        let sessions = TestSessions::new();
        let app = test::init_service(
            sessions.app().route(
                "/",
                web::get().to(|session: Session| async move {
                    let stamp = session
                        .get::<String>(ISSUED_AT_KEY)
                        .expect("readable stamp")
                        .unwrap_or_default();
                    HttpResponse::Ok().body(stamp)
                }),
            ),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let cookie = first
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned();
        let first_stamp = test::read_body(first).await;

        let second = test::call_service(
            &app,
            test::TestRequest::get().uri("/").cookie(cookie).to_request(),
        )
        .await;
        assert!(
            second.response().cookies().next().is_none(),
            "unchanged session is not re-issued"
        );
        assert_eq!(test::read_body(second).await, first_stamp);
        assert_eq!(sessions.record_count(), 1);
    }
}
