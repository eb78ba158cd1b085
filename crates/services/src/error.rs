//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by `TrainerSession` transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("exercise index {index} is out of range (catalog has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("the active exercise has not been solved yet")]
    NotCleared,

    #[error("already at the first exercise")]
    AtStart,

    #[error("already at the last exercise")]
    AtEnd,
}

/// Errors emitted by `SubmissionService`.
///
/// Validation failures (`MissingName`, `MissingScoreData`) mean no network
/// request was issued. `Rejected` and `Unreachable` are never retried
/// automatically; the caller may retry manually.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("a non-empty name is required")]
    MissingName,

    #[error("score data is missing")]
    MissingScoreData,

    #[error("collection service rejected the submission with status {status}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("collection service is unreachable")]
    Unreachable(#[source] reqwest::Error),

    #[error("collection service returned an unparseable response")]
    InvalidResponse,
}

/// Errors emitted by `DashboardClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("collection service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("collection service reported failure: {0}")]
    Failure(String),

    #[error("collection service response carried no data")]
    MissingData,
}
