use serde_json::Value;

/// Errors that can occur when talking to the dashboard server.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP {status} for {path}: {body}")]
    Http {
        path: String,
        status: u16,
        body: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl RemoteError {
    /// The HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result of a successful `submit`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The server accepted the write and answered with this body.
    Created(Value),
    /// The server answered with the caller's conflict status. Nothing was
    /// written; overwriting an existing resource is not implemented.
    AlreadyExists,
}

/// Authenticated access to the dashboard server's HTTP API.
///
/// Paths are absolute API paths such as `/api/datasources`.
#[async_trait::async_trait]
pub trait Remote: Send + Sync {
    /// Human-readable label for the server, used in log lines.
    fn label(&self) -> &str;

    /// GET `path` and return the parsed JSON body.
    async fn fetch(&self, path: &str) -> Result<Value, RemoteError>;

    /// POST `body` to `path`.
    ///
    /// When `conflict_status` is set and the server answers with exactly
    /// that status, the call succeeds with [`SubmitOutcome::AlreadyExists`].
    /// Any other non-2xx status is an error.
    async fn submit(
        &self,
        path: &str,
        body: &Value,
        conflict_status: Option<u16>,
    ) -> Result<SubmitOutcome, RemoteError>;
}
