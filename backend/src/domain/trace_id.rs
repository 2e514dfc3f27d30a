//! Correlation id shared by every log line and error raised for one request.
//!
//! The `Trace` middleware installs the id in Tokio task-local storage before
//! the rest of the pipeline runs. Work moved onto another task (for example
//! `spawn_blocking` in the session store) does not inherit it.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Response header echoing the request's trace id.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Random per-request identifier.
///
/// # Examples
/// ```
/// use session_gateway::domain::TraceId;
///
/// async fn lookup() {
///     let trace_id = TraceId::current();
///     tracing::debug!(?trace_id, "looking up user");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh v4 identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|trace_id| *trace_id).ok()
    }

    /// Drive `fut` with `trace_id` installed.
    ///
    /// # Examples
    /// ```
    /// use session_gateway::domain::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id = TraceId::generate();
    /// let seen = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }

    /// Call `f` with `trace_id` installed.
    pub fn sync_scope<R>(trace_id: Self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(trace_id, f)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
