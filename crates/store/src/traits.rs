//! The remote store capability trait.

use std::path::Path;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::RemoteEntry;

/// Path-addressed operations a remote cloud store must provide.
///
/// Implementations wrap an actual cloud client; transport, retries, and
/// consistency guarantees are their concern, not the caller's. Paths are
/// slash-delimited virtual paths without a leading separator; the empty
/// string addresses the root.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Upload in-memory content to `path`, overwriting any existing file.
    ///
    /// # Arguments
    /// * `path` - Target path in the store
    /// * `contents` - File content to upload
    async fn create_file(&self, path: &str, contents: &[u8]) -> Result<(), StoreError>;

    /// Upload a local file to `path` (large-transfer variant of
    /// [`create_file`](Self::create_file)).
    ///
    /// # Arguments
    /// * `local` - Local file to read content from
    /// * `path` - Target path in the store
    async fn upload(&self, local: &Path, path: &str) -> Result<(), StoreError>;

    /// Remove the file or folder at `path`. Removing a folder takes its
    /// subtree with it.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;

    /// Move an entry to a new path.
    async fn rename(&self, path: &str, new_path: &str) -> Result<(), StoreError>;

    /// Copy an entry to a new path.
    async fn copy(&self, path: &str, new_path: &str) -> Result<(), StoreError>;

    /// Create an empty folder at `path`. The parent folder must exist.
    async fn create_folder(&self, path: &str) -> Result<(), StoreError>;

    /// List the immediate children of `directory` (`""` for the root).
    ///
    /// # Returns
    /// One [`RemoteEntry`] per child; an empty folder yields an empty vec.
    async fn list_files(&self, directory: &str) -> Result<Vec<RemoteEntry>, StoreError>;

    /// Download the file at `path` into the local `destination`.
    ///
    /// # Arguments
    /// * `path` - Source path in the store
    /// * `destination` - Local file to write content to
    async fn download(&self, path: &str, destination: &Path) -> Result<(), StoreError>;
}
