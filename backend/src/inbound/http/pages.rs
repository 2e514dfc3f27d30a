//! Public page handlers.
//!
//! ```text
//! GET /       home page
//! GET /login  login page
//! ```
//!
//! Neither route checks authentication.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get};

const HOME_BODY: &str = "You got home page!\n";
const LOGIN_PAGE_BODY: &str = "You got the login page!\n";

/// Serve the home page.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use session_gateway::inbound::http::pages::home;
///
/// let app = App::new().service(home);
/// ```
#[get("/")]
pub async fn home() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(HOME_BODY)
}

/// Serve the login page.
#[get("/login")]
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(LOGIN_PAGE_BODY)
}
