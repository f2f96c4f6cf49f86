//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SessionSummaryError;
use quiz_core::queue::QueueError;
use storage::repository::StorageError;

/// Errors emitted while loading a pair source or its manifest.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {name} failed")]
    Http {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{name} returned status {status}")]
    Status {
        name: String,
        status: reqwest::StatusCode,
    },

    #[error("{name} is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{name} must be an array of pairs or an object with a `pairs` array")]
    Shape { name: String },
}

/// Errors emitted while mutating a backing pair file in place.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MutationError {
    #[error("{name} does not hold a bare JSON array")]
    NotAnArray { name: String },

    #[error("index {index} is outside the array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted by `ScheduleService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScheduleError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Errors emitted by the session loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is no longer active")]
    Inactive,

    #[error("no question is currently presented")]
    NoCurrentQuestion,

    #[error("queue produced index {index} with no backing pair")]
    MissingPair { index: u32 },

    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
