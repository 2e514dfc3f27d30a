//! Authentication-gated endpoint.
//!
//! ```text
//! GET /authrequired
//! ```

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get};
use tracing::debug;

use crate::inbound::http::current_user::CurrentUser;

const PROTECTED_BODY: &str = "you hit the authentication endpoint\n";

/// Path of the protected endpoint; successful logins redirect here.
pub const AUTH_REQUIRED_PATH: &str = "/authrequired";

/// Answer authenticated requests; send everyone else to `/`.
#[get("/authrequired")]
pub async fn auth_required(current: CurrentUser) -> HttpResponse {
    debug!(authenticated = current.is_authenticated(), "protected endpoint hit");
    if current.is_authenticated() {
        HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(PROTECTED_BODY)
    } else {
        HttpResponse::Found()
            .insert_header((header::LOCATION, "/"))
            .finish()
    }
}
