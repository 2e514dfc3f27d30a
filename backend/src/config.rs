//! Gateway settings loaded via OrthoConfig.
//!
//! Values merge from CLI flags, `GATEWAY_*` environment variables and config
//! files. The session secret is deliberately absent here; see
//! [`crate::inbound::http::session_config`].

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_DIRECTORY_URL: &str = "http://localhost:5000";
const DEFAULT_SESSION_DIR: &str = "./sessions";
const DEFAULT_SESSION_TTL_SECONDS: u64 = 3600;
const DEFAULT_REAP_INTERVAL_SECONDS: u64 = 3600;
const MAX_SESSION_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

/// Configured session lifetime above the supported maximum of 100 years.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session TTL of {seconds}s exceeds the maximum of {max}s", max = MAX_SESSION_TTL_SECONDS)]
pub struct SessionTtlError {
    /// Rejected value.
    pub seconds: u64,
}

/// Runtime settings for the gateway process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GATEWAY")]
pub struct GatewaySettings {
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// Interface address to bind.
    pub bind_host: Option<String>,
    /// Base URL of the user directory service.
    pub directory_url: Option<String>,
    /// Per-request timeout for directory lookups, in milliseconds.
    pub directory_timeout_ms: Option<u64>,
    /// Directory holding session records.
    pub session_dir: Option<PathBuf>,
    /// Lifetime of a session record after its last write.
    pub session_ttl_seconds: Option<u64>,
    /// Interval between expired-session sweeps.
    pub reap_interval_seconds: Option<u64>,
}

impl GatewaySettings {
    /// Return the socket address to bind, falling back to `0.0.0.0:3000`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let host: IpAddr = self
            .bind_host
            .as_deref()
            .unwrap_or(DEFAULT_BIND_HOST)
            .parse()?;
        Ok(SocketAddr::new(host, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Return the directory base URL, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not an absolute URL.
    pub fn directory_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(
            self.directory_url
                .as_deref()
                .unwrap_or(DEFAULT_DIRECTORY_URL),
        )
    }

    /// Return the directory lookup timeout; unset means no timeout.
    pub fn directory_timeout(&self) -> Option<Duration> {
        self.directory_timeout_ms.map(Duration::from_millis)
    }

    /// Return the session directory, falling back to `./sessions`.
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR))
    }

    /// Return the session lifetime, falling back to one hour.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured lifetime exceeds 100 years.
    pub fn session_ttl(&self) -> Result<Duration, SessionTtlError> {
        let seconds = self
            .session_ttl_seconds
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS);
        if seconds > MAX_SESSION_TTL_SECONDS {
            return Err(SessionTtlError { seconds });
        }
        Ok(Duration::from_secs(seconds))
    }

    /// Return the reaper interval, falling back to one hour.
    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(
            self.reap_interval_seconds
                .unwrap_or(DEFAULT_REAP_INTERVAL_SECONDS),
        )
    }
}
