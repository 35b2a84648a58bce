//! Error types for remote store operations.

use thiserror::Error;

/// Errors that can occur while talking to a remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Path does not exist in the store.
    #[error("Path not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: String,
    },

    /// Any other store-originating failure (auth, network, quota, permission).
    #[error("Transport error at {path}: {message}")]
    Transport {
        /// Path the failed operation targeted.
        path: String,
        /// Store-provided failure description.
        message: String,
    },

    /// Local IO error while staging content for upload or download.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Local path where the error occurred.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create a NotFound error.
    ///
    /// # Arguments
    /// * `path` - The path that was not found
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a Transport error.
    ///
    /// # Arguments
    /// * `path` - Path the failed operation targeted
    /// * `message` - Store-provided failure description
    pub fn transport(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an Io error from std::io::Error.
    ///
    /// # Arguments
    /// * `path` - Local path where the error occurred
    /// * `source` - The underlying IO error
    pub fn io_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when this error means the path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
