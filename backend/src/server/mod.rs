//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{BrowserSession, CookieContentSecurity},
};
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::domain::LocalStrategy;
use crate::inbound::http::login::login;
use crate::inbound::http::pages::{home, login_page};
use crate::inbound::http::protected::auth_required;
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;
use crate::middleware::{SessionTracking, Trace};
use crate::outbound::directory::HttpUserDirectory;
use crate::outbound::password::DirectoryPasswordVerifier;
use crate::outbound::session_store::FileSessionStore;

/// Everything a single worker needs to assemble the application.
#[derive(Clone)]
pub struct AppDependencies {
    /// Handler state shared by every worker.
    pub http_state: web::Data<HttpState>,
    /// Server-side session storage.
    pub store: FileSessionStore,
    /// Cookie key and attributes.
    pub session: SessionSettings,
    /// Lifetime of a session record after its last write.
    pub session_ttl: std::time::Duration,
}

/// Assemble the gateway routes behind tracing and session middleware.
///
/// Middleware runs outermost first: `Trace`, then the session middleware,
/// then `SessionTracking` so new sessions are stamped before the session
/// middleware decides whether to persist them.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        store,
        session,
        session_ttl,
    } = deps;

    let state_ttl = CookieDuration::try_from(session_ttl).unwrap_or(CookieDuration::MAX);
    let session_mw = SessionMiddleware::builder(store, session.key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(session.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(session.same_site)
        .session_lifecycle(BrowserSession::default().state_ttl(state_ttl))
        .build();

    App::new()
        .app_data(http_state)
        .wrap(SessionTracking)
        .wrap(session_mw)
        .wrap(Trace)
        .service(home)
        .service(login_page)
        .service(login)
        .service(auth_required)
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// Opens the session directory, wires the HTTP user directory into the local
/// strategy and spawns the periodic session reaper on the current runtime.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the session directory cannot be opened,
/// the directory client cannot be built, or binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        session,
        bind_addr,
        directory_url,
        directory_timeout,
        session_dir,
        session_ttl,
        reap_interval,
    } = config;

    let store = FileSessionStore::open(&session_dir).map_err(std::io::Error::other)?;
    let directory = HttpUserDirectory::new(directory_url.clone(), directory_timeout)
        .map_err(std::io::Error::other)?;
    let directory = Arc::new(directory);
    let strategy = LocalStrategy::new(
        directory.clone(),
        Arc::new(DirectoryPasswordVerifier::default()),
    );
    let http_state = web::Data::new(HttpState::new(Arc::new(strategy), directory));

    info!(
        %bind_addr,
        directory_url = %directory_url,
        session_dir = %store.root().display(),
        key_fingerprint = %session.fingerprint(),
        key_source = ?session.key_source,
        "starting session gateway"
    );

    actix_web::rt::spawn(store.clone().run_reaper(reap_interval));

    let deps = AppDependencies {
        http_state,
        store,
        session,
        session_ttl,
    };
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    Ok(server)
}
