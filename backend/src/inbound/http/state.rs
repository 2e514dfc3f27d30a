//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::SessionIdentity;
use crate::domain::ports::{AuthenticationStrategy, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Strategy run by `POST /login`.
    pub strategy: Arc<dyn AuthenticationStrategy>,
    /// Restores the session user for handlers that extract `CurrentUser`.
    pub identity: SessionIdentity,
}

impl HttpState {
    /// Construct state from a strategy and the directory used to restore
    /// session users.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use session_gateway::domain::LocalStrategy;
    /// use session_gateway::domain::ports::FixtureUserDirectory;
    /// use session_gateway::inbound::http::state::HttpState;
    /// use session_gateway::outbound::password::DirectoryPasswordVerifier;
    ///
    /// let directory = Arc::new(FixtureUserDirectory::default());
    /// let strategy = LocalStrategy::new(directory.clone(), Arc::new(DirectoryPasswordVerifier::default()));
    /// let state = HttpState::new(Arc::new(strategy), directory);
    /// assert_eq!(state.strategy.name(), "local");
    /// ```
    pub fn new(strategy: Arc<dyn AuthenticationStrategy>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            strategy,
            identity: SessionIdentity::new(directory),
        }
    }
}
