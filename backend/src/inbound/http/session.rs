//! Typed access to the Actix session.
//!
//! The session carries exactly one application value, the serialised user
//! id under [`USER_ID_KEY`]. Handlers go through [`SessionContext`] instead of
//! touching raw keys.

use actix_session::Session;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SessionIdentity, User, UserId};

/// Session key holding the authenticated user's id.
pub(crate) const USER_ID_KEY: &str = "user_id";

/// Request extractor wrapping [`Session`].
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `user` as the session's authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the session state cannot be encoded.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        let serialized = SessionIdentity::serialize(user);
        self.0
            .insert(USER_ID_KEY, serialized.as_ref())
            .map_err(|err| Error::internal(format!("session write failed: {err}")))
    }

    /// User id stored by a previous login, if any.
    ///
    /// A stored value that is no longer a valid id is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the session state cannot be decoded.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|err| Error::internal(format!("session read failed: {err}")))?
        else {
            return Ok(None);
        };
        Ok(UserId::new(raw)
            .inspect_err(|error| warn!(%error, "ignoring malformed user id in session"))
            .ok())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { Ok(Self::new(session.await?)) })
    }
}

#[cfg(test)]
mod tests {
    use actix_session::Session;
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::{HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::domain::{Email, PasswordHash};
    use crate::inbound::http::test_utils::TestSessions;

    async fn login_as_fixture(session: SessionContext) -> Result<HttpResponse, Error> {
        let user = User::new(
            UserId::new("2f24vvg").expect("id"),
            Email::new("test@test.com").expect("email"),
            PasswordHash::new("hash"),
        );
        session.persist_user(&user)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn store_raw(session: Session) -> HttpResponse {
        session.insert(USER_ID_KEY, " padded ").expect("insert raw id");
        HttpResponse::Ok().finish()
    }

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let body = session
            .user_id()?
            .map_or_else(|| "anonymous".to_owned(), |id| id.to_string());
        Ok(HttpResponse::Ok().body(body))
    }

    fn cookie_of(res: &ServiceResponse) -> Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[rstest]
    #[case("/login", "2f24vvg")]
    #[case("/raw", "anonymous")]
    #[case("/noop", "anonymous")]
    #[actix_web::test]
    async fn whoami_reports_the_stored_user(#[case] setup: &str, #[case] expected: &str) {
        let sessions = TestSessions::new();
        let app = test::init_service(
            sessions
                .app()
                .route("/login", web::get().to(login_as_fixture))
                .route("/raw", web::get().to(store_raw))
                .route("/noop", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let setup_res =
            test::call_service(&app, test::TestRequest::get().uri(setup).to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie_of(&setup_res))
                .to_request(),
        )
        .await;

        assert_eq!(test::read_body(res).await, expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn requests_without_a_cookie_are_anonymous() {
        let sessions = TestSessions::new();
        let app =
            test::init_service(sessions.app().route("/whoami", web::get().to(whoami))).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;

        assert_eq!(test::read_body(res).await, "anonymous");
    }
}
