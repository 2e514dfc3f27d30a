//! Authenticated-user accessor for handlers.
//!
//! Resolves the session's user id through [`SessionIdentity`] when a handler
//! extracts [`CurrentUser`]. Routes that do not extract it never call the
//! directory. A lookup that fails for any reason leaves the request
//! unauthenticated rather than failing it.
//!
//! [`SessionIdentity`]: crate::domain::SessionIdentity

use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorInternalServerError, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::{TraceId, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The user attached to the current session, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(Option<User>);

impl CurrentUser {
    /// Whether a user was restored for this request.
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let session = session.await?;
            let state =
                state.ok_or_else(|| ErrorInternalServerError("HTTP state is not configured"))?;
            let Some(user_id) = session.user_id()? else {
                return Ok(Self(None));
            };
            match state.identity.deserialize(&user_id).await {
                Ok(user) => {
                    debug!(user_id = %user.id(), "session user restored");
                    Ok(Self(Some(user)))
                }
                Err(error) => {
                    warn!(
                        %user_id,
                        trace_id = ?TraceId::current().map(|id| id.to_string()),
                        code = ?error.code(),
                        %error,
                        "session user could not be restored; continuing unauthenticated"
                    );
                    Ok(Self(None))
                }
            }
        })
    }
}
