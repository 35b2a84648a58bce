//! The pluggable filesystem adapter surface.

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::content::{FileContents, FileStream};
use crate::error::AdapterError;
use crate::metadata::FileMetadata;

/// Access visibility of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// World readable.
    Public,
    /// Owner only.
    Private,
}

/// Filesystem-style operations over a path-addressed backend.
///
/// Any type implementing this trait is substitutable wherever a filesystem
/// backend is expected; no state or behavior beyond the contract is
/// required. Paths are slash-delimited virtual paths and are normalized by
/// implementations (see [`crate::path::normalize`]).
///
/// Backends without visibility control inherit the default
/// [`set_visibility`](Self::set_visibility)/[`visibility`](Self::visibility)
/// bodies, which deterministically fail with
/// [`AdapterError::Unsupported`] instead of silently succeeding.
#[async_trait]
pub trait FilesystemAdapter: Send + Sync {
    /// Write in-memory content to `path`, creating any missing parent
    /// directories first.
    async fn write(&self, path: &str, contents: &[u8]) -> Result<(), AdapterError>;

    /// Write streamed content to `path`, creating any missing parent
    /// directories first.
    async fn write_stream(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(), AdapterError>;

    /// Replace the content at `path`.
    ///
    /// Implemented as delete-then-write: a crash between the two steps loses
    /// the file. Sequential callers always observe the new content.
    async fn update(&self, path: &str, contents: &[u8]) -> Result<(), AdapterError>;

    /// Streamed variant of [`update`](Self::update).
    async fn update_stream(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(), AdapterError>;

    /// Move an entry to a new path.
    async fn rename(&self, path: &str, new_path: &str) -> Result<(), AdapterError>;

    /// Copy an entry to a new path.
    async fn copy(&self, path: &str, new_path: &str) -> Result<(), AdapterError>;

    /// Remove the file at `path`.
    async fn delete(&self, path: &str) -> Result<(), AdapterError>;

    /// Remove the directory at `path`.
    ///
    /// Uses the same underlying store call as [`delete`](Self::delete); the
    /// store handles both.
    async fn delete_directory(&self, path: &str) -> Result<(), AdapterError>;

    /// Create a directory, including any missing ancestors.
    async fn create_directory(&self, path: &str) -> Result<(), AdapterError>;

    /// Whether an entry exists at `path`.
    ///
    /// Absence reported by the store is converted to `false`; every other
    /// error re-raises.
    async fn exists(&self, path: &str) -> Result<bool, AdapterError>;

    /// Read the full content at `path`.
    async fn read(&self, path: &str) -> Result<FileContents, AdapterError>;

    /// Open a readable stream over the content at `path`.
    ///
    /// The stream is single-use and forward-only; dropping it releases the
    /// backing resource on every exit path.
    async fn read_stream(&self, path: &str) -> Result<FileStream, AdapterError>;

    /// List the children of `directory`.
    ///
    /// With `recursive`, each child directory is expanded depth-first
    /// immediately after its own entry, so parents always precede their
    /// children. An empty directory yields an empty vec.
    async fn list_contents(
        &self,
        directory: &str,
        recursive: bool,
    ) -> Result<Vec<FileMetadata>, AdapterError>;

    /// Metadata for the single entry at `path`.
    async fn metadata(&self, path: &str) -> Result<FileMetadata, AdapterError>;

    /// Size in bytes, derived from [`metadata`](Self::metadata).
    /// Directories have none.
    async fn size(&self, path: &str) -> Result<Option<u64>, AdapterError>;

    /// MIME type guessed from the path's extension alone; never consults
    /// the store.
    fn mime_type(&self, path: &str) -> String;

    /// Last-modified timestamp (Unix epoch seconds), derived from
    /// [`metadata`](Self::metadata).
    async fn timestamp(&self, path: &str) -> Result<Option<i64>, AdapterError>;

    /// Set entry visibility.
    async fn set_visibility(
        &self,
        path: &str,
        visibility: Visibility,
    ) -> Result<(), AdapterError> {
        let _ = (path, visibility);
        Err(AdapterError::unsupported("set_visibility"))
    }

    /// Get entry visibility.
    async fn visibility(&self, path: &str) -> Result<Visibility, AdapterError> {
        let _ = path;
        Err(AdapterError::unsupported("visibility"))
    }
}
