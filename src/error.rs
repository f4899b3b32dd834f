//! Error types for the section classifier.
//!
//! This module defines all error types that can occur while annotating,
//! classifying, training, or persisting a section model.

use std::path::PathBuf;

/// Result type alias for section classifier operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during section classification.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A category, partition, or input argument was empty or otherwise unusable.
    ///
    /// Raised before any state is mutated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested operation cannot be performed on the current model.
    ///
    /// Partitioned classification needs at least two candidate partitions.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A training sample was taught before the training counts were initialized.
    #[error("Training counts not initialized; call init_training_count() first")]
    TrainingNotInitialized,

    /// Reading or writing a model snapshot, stop-word list, or corpus file failed.
    #[error("Persistence failure on '{}': {source}", path.display())]
    Persistence {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The word-probability store could not service a request (e.g. a corrupt snapshot).
    #[error("Data source unavailable: {0}")]
    DataSource(String),
}

impl Error {
    /// Wrap an I/O error with the path it occurred on.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Returns true for failures the batch driver should treat as fatal for the whole run
    /// rather than for a single document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Persistence { .. } | Error::DataSource(_))
    }
}
