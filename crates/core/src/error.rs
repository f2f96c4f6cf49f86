use thiserror::Error;

use crate::model::{SessionSummaryError, SourceIdError};
use crate::queue::QueueError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Source(#[from] SourceIdError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
