//! Test helpers for inbound HTTP components.

use actix_session::SessionMiddleware;
use actix_web::App;
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use tempfile::TempDir;

use crate::middleware::SessionTracking;
use crate::outbound::session_store::FileSessionStore;

/// File-backed session storage rooted in a throwaway directory.
///
/// - Generates a fresh signing/encryption key per instance.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub struct TestSessions {
    dir: TempDir,
    store: FileSessionStore,
    key: Key,
}

impl TestSessions {
    /// Create an empty store in a new temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("session tempdir");
        let store = FileSessionStore::open(dir.path()).expect("open session store");
        Self {
            dir,
            store,
            key: Key::generate(),
        }
    }

    /// Number of session records currently on disk.
    pub fn record_count(&self) -> usize {
        std::fs::read_dir(self.dir.path())
            .expect("list session dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .count()
    }

    /// Session middleware backed by this store.
    pub fn middleware(&self) -> SessionMiddleware<FileSessionStore> {
        SessionMiddleware::builder(self.store.clone(), self.key.clone())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build()
    }

    /// App wired like production: session tracking inside the session
    /// middleware.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new().wrap(SessionTracking).wrap(self.middleware())
    }
}
