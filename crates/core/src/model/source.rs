use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

const REQUIRED_EXTENSION: &str = ".json";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceIdError {
    #[error("source name is empty")]
    Empty,

    #[error("source name {name:?} must end in .json")]
    MissingExtension { name: String },

    #[error("source name {name:?} contains a parent-directory segment")]
    ParentTraversal { name: String },

    #[error("source name {name:?} contains a path separator")]
    PathSeparator { name: String },
}

/// Validated name of a JSON resource backing one question set.
///
/// The source id is the partition key for all persisted scheduling state and
/// the only value accepted by the mutation endpoint, so it must resolve to a
/// plain `.json` file directly under the configured data directory.
///
/// # Examples
///
/// ```
/// # use quiz_core::model::SourceId;
/// let source = SourceId::parse("pairs-1.json").unwrap();
/// assert_eq!(source.as_str(), "pairs-1.json");
/// assert!(SourceId::parse("../etc/passwd.json").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceId(String);

impl SourceId {
    /// Validate and wrap a filename.
    ///
    /// # Errors
    ///
    /// Returns `SourceIdError` when the name is empty, lacks the `.json`
    /// extension, contains `..`, or contains a path separator.
    pub fn parse(name: impl Into<String>) -> Result<Self, SourceIdError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SourceIdError::Empty);
        }
        if name.contains("..") {
            return Err(SourceIdError::ParentTraversal { name });
        }
        if name.contains('/') || name.contains('\\') {
            return Err(SourceIdError::PathSeparator { name });
        }
        if !name.ends_with(REQUIRED_EXTENSION) || name.len() == REQUIRED_EXTENSION.len() {
            return Err(SourceIdError::MissingExtension { name });
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SourceId {
    type Err = SourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
