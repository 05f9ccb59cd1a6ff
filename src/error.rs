use thiserror::Error;

/// Failure taxonomy of the orchestrator.
///
/// - `NotFound`      — a lookup miss: unknown repository name/URL, or a
///                     backend resource answering 404.
/// - `Upstream`      — any failed backend call (transport error or non-2xx).
/// - `Validation`    — a malformed mutation request, rejected before any
///                     request is issued.
///
/// "Installer job not yet complete" is deliberately not here: it is a
/// recoverable signal carried by `LoadOutcome::NotYetComplete`, not an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("invalid request: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
