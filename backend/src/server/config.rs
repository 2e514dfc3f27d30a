//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::inbound::http::session_config::SessionSettings;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) directory_url: Url,
    pub(crate) directory_timeout: Option<Duration>,
    pub(crate) session_dir: PathBuf,
    pub(crate) session_ttl: Duration,
    pub(crate) reap_interval: Duration,
}

impl ServerConfig {
    /// Construct a server configuration with default session lifetimes.
    ///
    /// Sessions live for an hour and the reaper sweeps once an hour until
    /// overridden.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        directory_url: Url,
        session_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            session,
            bind_addr,
            directory_url,
            directory_timeout: None,
            session_dir: session_dir.into(),
            session_ttl: DEFAULT_SESSION_TTL,
            reap_interval: DEFAULT_SESSION_TTL,
        }
    }

    /// Bound every directory request by `timeout`.
    #[must_use]
    pub fn with_directory_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.directory_timeout = timeout;
        self
    }

    /// Override how long an idle session record stays valid.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Override how often expired session records are swept.
    #[must_use]
    pub fn with_reap_interval(mut self, interval: Duration) -> Self {
        self.reap_interval = interval;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the directory holding session records.
    #[must_use]
    pub fn session_dir(&self) -> &PathBuf {
        &self.session_dir
    }
}
