/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * Only store mutation and configuration can fail. Directory lookups
 * report absence through `Option` and never produce one of these.
 */

use super::types::{MonitorOwner, UnitId};
use crate::directory::ExecutionMode;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Execution directory errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum DirectoryError {
    #[error("Invalid bucket count {0}")]
    #[diagnostic(
        code(directory::invalid_bucket_count),
        help("The bucket table needs a non-zero power of two bucket count.")
    )]
    InvalidBucketCount(usize),

    #[error("Bucket index {index} out of range for a table of {count} buckets")]
    #[diagnostic(code(directory::bucket_out_of_range))]
    BucketOutOfRange { index: usize, count: usize },

    #[error("Execution mode already fixed to {current}, cannot switch to {requested}")]
    #[diagnostic(
        code(directory::mode_already_fixed),
        help("The execution mode is chosen once per process, before any directory is built.")
    )]
    ModeAlreadyFixed {
        current: ExecutionMode,
        requested: ExecutionMode,
    },

    #[error("Execution unit {0} is already registered")]
    #[diagnostic(code(directory::already_registered))]
    AlreadyRegistered(UnitId),

    #[error("Execution unit {0} is not registered")]
    #[diagnostic(
        code(directory::not_registered),
        help("The unit may already have been torn down.")
    )]
    NotRegistered(UnitId),

    #[error("Monitor {token} is already owned by {owner}")]
    #[diagnostic(
        code(directory::monitor_owned),
        help("Release the monitor before another unit claims it.")
    )]
    MonitorOwned { token: MonitorOwner, owner: UnitId },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(directory::invalid_config))]
    InvalidConfig(String),
}

/// Common result type for directory store operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ThreadId;

    #[test]
    fn test_error_display() {
        let err = DirectoryError::BucketOutOfRange { index: 9, count: 4 };
        assert_eq!(
            err.to_string(),
            "Bucket index 9 out of range for a table of 4 buckets"
        );

        let err = DirectoryError::AlreadyRegistered(UnitId::Thread(ThreadId(3)));
        assert_eq!(err.to_string(), "Execution unit thread#3 is already registered");
    }

    #[test]
    fn test_error_serialization() {
        let err = DirectoryError::InvalidBucketCount(3);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("invalid_bucket_count"));

        let back: DirectoryError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
