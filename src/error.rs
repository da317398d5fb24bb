// Error taxonomy for the record store and the admin workflow
//
// Client-input failures (category, index, staleness, secret) are detected
// before any write. Persistence and contention failures are server-side.

use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected header in {path}: {found:?}")]
    BadHeader { path: String, found: Vec<String> },

    #[error("failed to promote temporary file: {0}")]
    Promote(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid category: {category}")]
    InvalidCategory { category: String },

    #[error("Invalid index {index}: store has {len} entries")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Entry at index {index} changed since it was read")]
    StaleIndex { index: usize },

    #[error("Invalid password")]
    Unauthorized,

    #[error("store busy: write gate not acquired after {waited:?}")]
    Contended { waited: Duration },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    /// True for failures caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidCategory { .. }
                | StoreError::IndexOutOfRange { .. }
                | StoreError::StaleIndex { .. }
                | StoreError::Unauthorized
        )
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Persistence(PersistenceError::Io(err))
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Persistence(PersistenceError::Csv(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_classified() {
        assert!(StoreError::Unauthorized.is_client_error());
        assert!(StoreError::InvalidCategory { category: "Soup".into() }.is_client_error());
        assert!(StoreError::IndexOutOfRange { index: -1, len: 0 }.is_client_error());
        assert!(StoreError::StaleIndex { index: 2 }.is_client_error());

        let io = io::Error::new(io::ErrorKind::Other, "disk gone");
        assert!(!StoreError::from(io).is_client_error());
        assert!(!StoreError::Contended { waited: Duration::from_millis(10) }.is_client_error());
    }

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = StoreError::InvalidCategory { category: "Soup".into() };
        assert_eq!(err.to_string(), "Invalid category: Soup");

        let err = StoreError::IndexOutOfRange { index: 7, len: 3 };
        assert!(err.to_string().contains("7"));
        assert!(err.to_string().contains("3 entries"));
    }
}
