//! File-backed implementation of `actix_session::storage::SessionStore`.
//!
//! Each session lives in `<dir>/<key>.json` as
//! `{"state": {...}, "expiresAt": "<RFC 3339>"}`. Writes land in a uniquely
//! named staging file which is renamed over the record, so readers never see a
//! partial write. Expired records are removed lazily on load and in bulk by
//! [`FileSessionStore::reap_expired`].
//!
//! All filesystem access goes through a `cap_std` directory handle on the
//! blocking thread pool.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_web::cookie::time::Duration;
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// Length of generated session keys.
pub const SESSION_KEY_LENGTH: usize = 64;

const RECORD_SUFFIX: &str = ".json";
const STAGING_PREFIX: &str = ".tmp-session-";

type SessionState = HashMap<String, String>;

/// Errors raised by the file store before they cross into `actix-session`.
#[derive(Debug, thiserror::Error)]
pub enum SessionFileError {
    /// Filesystem access failed.
    #[error("session store I/O failed for {path}: {source}")]
    Io {
        /// Path relative to the store root, or the root itself.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A record could not be encoded.
    #[error("failed to encode session record: {0}")]
    Encode(#[source] serde_json::Error),
    /// The blocking task running the I/O did not complete.
    #[error("session store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// The TTL pushes the expiry past the representable date range.
    #[error("session TTL of {seconds}s is out of range")]
    TtlOutOfRange {
        /// Requested lifetime in whole seconds.
        seconds: i64,
    },
}

impl SessionFileError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    state: SessionState,
    expires_at: DateTime<Utc>,
}

impl SessionRecord {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Session store persisting one JSON file per session.
#[derive(Clone)]
pub struct FileSessionStore {
    root: PathBuf,
    dir: Arc<Dir>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl FileSessionStore {
    /// Open (creating if needed) the session directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionFileError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionFileError> {
        Self::open_with_clock(path, Arc::new(DefaultClock))
    }

    /// Open the session directory using `clock` to stamp and check expiry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionFileError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open_with_clock(
        path: impl AsRef<Path>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, SessionFileError> {
        let root = path.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|error| SessionFileError::io(&root, error))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|error| SessionFileError::io(&root, error))?;
        Ok(Self {
            root,
            dir: Arc::new(dir),
            clock,
        })
    }

    /// Directory holding the session records.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete every expired or unreadable record, returning how many were
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be listed. Failures on
    /// individual records are logged and skipped.
    pub async fn reap_expired(&self) -> Result<usize, SessionFileError> {
        let dir = Arc::clone(&self.dir);
        let now = self.clock.utc();
        tokio::task::spawn_blocking(move || reap_blocking(&dir, now)).await?
    }

    /// Run [`Self::reap_expired`] every `period` until the task is dropped.
    ///
    /// The first sweep happens one full period after start. Periods under a
    /// second are raised to one second.
    pub async fn run_reaper(self, period: std::time::Duration) {
        let period = period.max(std::time::Duration::from_secs(1));
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            ticker.tick().await;
            match self.reap_expired().await {
                Ok(0) => debug!("no expired sessions to reap"),
                Ok(removed) => debug!(removed, "reaped expired sessions"),
                Err(error) => warn!(%error, "session reaper sweep failed"),
            }
        }
    }

    fn expiry(&self, ttl: &Duration) -> Result<DateTime<Utc>, SessionFileError> {
        let seconds = ttl.whole_seconds();
        TimeDelta::try_seconds(seconds)
            .and_then(|delta| self.clock.utc().checked_add_signed(delta))
            .ok_or(SessionFileError::TtlOutOfRange { seconds })
    }

    async fn read(&self, key: String) -> Result<Option<SessionRecord>, SessionFileError> {
        let dir = Arc::clone(&self.dir);
        let now = self.clock.utc();
        tokio::task::spawn_blocking(move || read_blocking(&dir, &key, now)).await?
    }

    async fn write(&self, key: String, record: SessionRecord) -> Result<(), SessionFileError> {
        let dir = Arc::clone(&self.dir);
        let bytes = serde_json::to_vec(&record).map_err(SessionFileError::Encode)?;
        tokio::task::spawn_blocking(move || write_blocking(&dir, &key, &bytes)).await?
    }
}

impl std::fmt::Debug for FileSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSessionStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self, session_key: &SessionKey) -> Result<Option<SessionState>, LoadError> {
        let key = session_key.as_ref();
        if !is_valid_key(key) {
            return Ok(None);
        }
        let record = self
            .read(key.to_owned())
            .await
            .map_err(|error| LoadError::Other(error.into()))?;
        Ok(record.map(|record| record.state))
    }

    async fn save(
        &self,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, SaveError> {
        let key = generate_key();
        let expires_at = self
            .expiry(ttl)
            .map_err(|error| SaveError::Other(error.into()))?;
        let record = SessionRecord {
            state: session_state,
            expires_at,
        };
        self.write(key.clone(), record)
            .await
            .map_err(|error| match error {
                SessionFileError::Encode(_) => SaveError::Serialization(error.into()),
                other => SaveError::Other(other.into()),
            })?;
        SessionKey::try_from(key).map_err(|error| {
            SaveError::Other(anyhow::anyhow!("generated session key rejected: {error}"))
        })
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, UpdateError> {
        if !is_valid_key(session_key.as_ref()) {
            return self
                .save(session_state, ttl)
                .await
                .map_err(|error| match error {
                    SaveError::Serialization(inner) => UpdateError::Serialization(inner),
                    SaveError::Other(inner) => UpdateError::Other(inner),
                });
        }
        let expires_at = self
            .expiry(ttl)
            .map_err(|error| UpdateError::Other(error.into()))?;
        let record = SessionRecord {
            state: session_state,
            expires_at,
        };
        self.write(session_key.as_ref().to_owned(), record)
            .await
            .map_err(|error| match error {
                SessionFileError::Encode(_) => UpdateError::Serialization(error.into()),
                other => UpdateError::Other(other.into()),
            })?;
        Ok(session_key)
    }

    async fn update_ttl(
        &self,
        session_key: &SessionKey,
        ttl: &Duration,
    ) -> Result<(), anyhow::Error> {
        let key = session_key.as_ref();
        if !is_valid_key(key) {
            return Ok(());
        }
        let Some(mut record) = self.read(key.to_owned()).await? else {
            return Ok(());
        };
        record.expires_at = self.expiry(ttl)?;
        self.write(key.to_owned(), record).await?;
        Ok(())
    }

    async fn delete(&self, session_key: &SessionKey) -> Result<(), anyhow::Error> {
        let key = session_key.as_ref();
        if !is_valid_key(key) {
            return Ok(());
        }
        let dir = Arc::clone(&self.dir);
        let name = record_name(key);
        tokio::task::spawn_blocking(move || remove_if_present(&dir, &name)).await??;
        Ok(())
    }
}

/// Random session key of [`SESSION_KEY_LENGTH`] ASCII alphanumerics.
fn generate_key() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Only plain alphanumeric keys ever map onto a file name.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|byte| byte.is_ascii_alphanumeric())
}

fn record_name(key: &str) -> String {
    format!("{key}{RECORD_SUFFIX}")
}

fn read_blocking(
    dir: &Dir,
    key: &str,
    now: DateTime<Utc>,
) -> Result<Option<SessionRecord>, SessionFileError> {
    let name = record_name(key);
    let bytes = match dir.read(&name) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(SessionFileError::io(name, error)),
    };
    let record: SessionRecord = match serde_json::from_slice(&bytes) {
        Ok(record) => record,
        Err(error) => {
            warn!(file = %name, %error, "discarding unreadable session record");
            remove_if_present(dir, &name)?;
            return Ok(None);
        }
    };
    if record.is_expired(now) {
        debug!(file = %name, "session record expired");
        remove_if_present(dir, &name)?;
        return Ok(None);
    }
    Ok(Some(record))
}

fn write_blocking(dir: &Dir, key: &str, bytes: &[u8]) -> Result<(), SessionFileError> {
    let name = record_name(key);
    let staging = format!("{STAGING_PREFIX}{}", Uuid::new_v4().simple());
    dir.write(&staging, bytes)
        .map_err(|error| SessionFileError::io(&staging, error))?;
    if let Err(error) = dir.rename(&staging, dir, &name) {
        if let Err(cleanup) = dir.remove_file(&staging) {
            warn!(file = %staging, error = %cleanup, "failed to remove staging file");
        }
        return Err(SessionFileError::io(name, error));
    }
    Ok(())
}

fn remove_if_present(dir: &Dir, name: &str) -> Result<(), SessionFileError> {
    match dir.remove_file(name) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(SessionFileError::io(name, error)),
    }
}

fn reap_blocking(dir: &Dir, now: DateTime<Utc>) -> Result<usize, SessionFileError> {
    let entries = dir
        .entries()
        .map_err(|error| SessionFileError::io(".", error))?;
    let mut removed = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(%error, "skipping unreadable session directory entry");
                continue;
            }
        };
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(key) = name.strip_suffix(RECORD_SUFFIX) else {
            continue;
        };
        if !is_valid_key(key) {
            continue;
        }
        let stale = match dir.read(name) {
            Ok(bytes) => serde_json::from_slice::<SessionRecord>(&bytes)
                .map_or(true, |record| record.is_expired(now)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => continue,
            Err(error) => {
                warn!(file = %name, %error, "skipping unreadable session record");
                continue;
            }
        };
        if stale {
            match remove_if_present(dir, name) {
                Ok(()) => removed += 1,
                Err(error) => warn!(%error, "failed to reap session record"),
            }
        }
    }
    Ok(removed)
}
