//! Adapter error taxonomy.

use cloudfs_store::StoreError;
use thiserror::Error;

/// Errors surfaced by filesystem adapter operations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Path does not exist.
    #[error("Path not found: {path}")]
    NotFound {
        /// The missing path.
        path: String,
    },

    /// Operation the backing store cannot support.
    #[error("Operation not supported: {operation}")]
    Unsupported {
        /// Name of the unsupported operation.
        operation: &'static str,
    },

    /// Store failure other than not-found, passed through unchanged.
    #[error(transparent)]
    Store(StoreError),

    /// Local IO failure while staging streamed content.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path the operation targeted.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl AdapterError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an Unsupported error.
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Create an Io error from std::io::Error.
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

/// Classify store errors at the boundary: absence becomes
/// [`AdapterError::NotFound`]; everything else stays a transport-class
/// [`AdapterError::Store`].
impl From<StoreError> for AdapterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path } => AdapterError::NotFound { path },
            other => AdapterError::Store(other),
        }
    }
}
