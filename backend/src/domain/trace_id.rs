//! Per-request correlation identifier.
//!
//! The [`Trace`](crate::middleware::Trace) middleware puts a [`TraceId`] in
//! tokio task-local storage for the lifetime of each request. Error
//! constructors read it back so every error body names the request that
//! produced it. Task-locals do not follow `tokio::spawn`; wrap spawned work
//! in [`TraceId::scope`] to carry the identifier along.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID naming one request.
///
/// # Examples
/// ```
/// use listings::domain::TraceId;
///
/// fn log_prefix() -> String {
///     TraceId::current().map_or_else(|| "-".to_owned(), |id| id.to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a caller-supplied identifier when it is a UUID, else mint one.
    #[must_use]
    pub fn from_header_or_new(header: Option<&str>) -> Self {
        header
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<F: Future>(trace_id: Self, fut: F) -> F::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
