use thiserror::Error;

/// Errors surfaced by the navigation, editing and GitHub layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing editor, missing or unauthenticated `gh`, bad config.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("GitHub API error{}: {message}", fmt_status(.status))]
    HostApi { status: Option<u16>, message: String },

    /// Editor returned nothing usable. A cancellation, not a failure.
    #[error("input was empty")]
    EmptyInput,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("an editor session is already open")]
    SessionBusy,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl Error {
    pub fn host_api(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::HostApi {
            status,
            message: message.into(),
        }
    }

    /// True for the sentinel that callers treat as a silent no-op.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::EmptyInput)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
