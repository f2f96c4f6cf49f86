#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryScheduleRepository, ScheduleRepository, StorageError};
pub use sqlite::{SqliteInitError, SqliteRepository};
