use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::SourceId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("ended_at is before started_at")]
    InvalidTimeRange,
}

/// Terminal report for one question session: how many questions were
/// answered between start and end. Sessions are ephemeral, so the summary is
/// the only artifact that outlives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    source: SourceId,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    answered: u32,
}

impl SessionSummary {
    /// Build a summary from session bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `ended_at` is
    /// before `started_at`.
    pub fn from_parts(
        source: SourceId,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        answered: u32,
    ) -> Result<Self, SessionSummaryError> {
        if ended_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        Ok(Self {
            source,
            started_at,
            ended_at,
            answered,
        })
    }

    #[must_use]
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    /// Wall-clock length of the session.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.ended_at - self.started_at
    }
}
