//! Adapter translating filesystem operations into remote store calls.

use std::collections::HashSet;

use async_trait::async_trait;
use cloudfs_store::{EntryKind, RemoteStore};
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::content::{ContentStream, FileContents, FileStream};
use crate::error::AdapterError;
use crate::metadata::FileMetadata;
use crate::mime::mime_for_path;
use crate::path::{self, PathPrefix};
use crate::traits::FilesystemAdapter;

/// Filesystem adapter over a [`RemoteStore`].
///
/// Holds nothing but the injected client and an optional path prefix; every
/// operation is a stateless request/response cycle against the store. No
/// retries, timeouts, or local recovery happen at this layer.
///
/// # Type Parameters
/// * `C` - A type implementing [`RemoteStore`]
pub struct RemoteStoreAdapter<C: RemoteStore> {
    /// The underlying store client.
    client: C,
    /// Optional root prefix for all store traffic.
    prefix: PathPrefix,
}

impl<C: RemoteStore> RemoteStoreAdapter<C> {
    /// Create an adapter over `client` addressing the store's root.
    pub fn new(client: C) -> Self {
        Self {
            client,
            prefix: PathPrefix::default(),
        }
    }

    /// Confine all store traffic under `prefix`.
    ///
    /// The prefix folder itself must already exist in the store.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = PathPrefix::new(prefix);
        self
    }

    /// Reference to the underlying store client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Look up one entry by listing its parent directory and matching on
    /// the entry name.
    async fn find_entry(&self, logical: &str) -> Result<FileMetadata, AdapterError> {
        if logical.is_empty() {
            return Err(AdapterError::not_found(logical));
        }
        let parent: &str = path::parent(logical);
        let name: &str = path::name(logical);
        let entries = match self.client.list_files(&self.prefix.apply(parent)).await {
            Ok(entries) => entries,
            // A missing parent directory means the path itself is missing.
            Err(err) if err.is_not_found() => return Err(AdapterError::not_found(logical)),
            Err(err) => return Err(err.into()),
        };
        entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| FileMetadata::from_entry(entry, logical))
            .ok_or_else(|| AdapterError::not_found(logical))
    }

    /// Existence probe for one normalized path: a metadata probe whose
    /// absence becomes `false`, with any other error re-raised.
    async fn probe(&self, logical: &str) -> Result<bool, AdapterError> {
        if logical.is_empty() {
            // The root always exists.
            return Ok(true);
        }
        match self.find_entry(logical).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create every missing ancestor of `logical`, shallow to deep.
    ///
    /// O(depth) existence probes; probe and creation failures abort the
    /// surrounding write rather than being swallowed.
    async fn ensure_ancestors(&self, logical: &str) -> Result<(), AdapterError> {
        for ancestor in path::ancestors(logical) {
            if !self.probe(&ancestor).await? {
                tracing::debug!("Creating missing parent directory: {}", ancestor);
                self.client
                    .create_folder(&self.prefix.apply(&ancestor))
                    .await?;
            }
        }
        Ok(())
    }

    /// Delete the entry at `logical`, tolerating absence.
    async fn delete_existing(&self, logical: &str) -> Result<(), AdapterError> {
        match self.client.delete(&self.prefix.apply(logical)).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Spool `reader` into a temporary file and upload it to `logical`.
    ///
    /// The spool file is unlinked when this returns, on success and on
    /// every error path.
    async fn upload_spooled(
        &self,
        logical: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(), AdapterError> {
        let spool = tempfile::NamedTempFile::new()
            .map_err(|e| AdapterError::io_error(logical, e))?
            .into_temp_path();
        let mut file: tokio::fs::File = tokio::fs::File::create(&spool)
            .await
            .map_err(|e| AdapterError::io_error(logical, e))?;
        tokio::io::copy(reader, &mut file)
            .await
            .map_err(|e| AdapterError::io_error(logical, e))?;
        file.flush()
            .await
            .map_err(|e| AdapterError::io_error(logical, e))?;
        drop(file);

        self.client
            .upload(&spool, &self.prefix.apply(logical))
            .await?;
        Ok(())
    }

    /// Depth-first listing: each directory is listed once, its entries
    /// appended in listing order, and child directories expanded
    /// immediately after their own entry.
    fn list_into<'a>(
        &'a self,
        directory: String,
        recursive: bool,
        visited: &'a mut HashSet<String>,
        items: &'a mut Vec<FileMetadata>,
    ) -> BoxFuture<'a, Result<(), AdapterError>> {
        async move {
            if !visited.insert(directory.clone()) {
                return Ok(());
            }
            let entries = self.client.list_files(&self.prefix.apply(&directory)).await?;
            for entry in &entries {
                let logical: String = self.prefix.strip(&entry.path).to_string();
                let meta: FileMetadata = FileMetadata::from_entry(entry, logical.clone());
                let is_dir: bool = meta.is_dir();
                items.push(meta);
                if recursive && is_dir {
                    self.list_into(logical, recursive, &mut *visited, &mut *items)
                        .await?;
                }
            }
            Ok(())
        }
        .boxed()
    }
}

#[async_trait]
impl<C: RemoteStore> FilesystemAdapter for RemoteStoreAdapter<C> {
    async fn write(&self, path: &str, contents: &[u8]) -> Result<(), AdapterError> {
        let logical: String = path::normalize(path);
        tracing::debug!("write: {} ({} bytes)", logical, contents.len());
        self.ensure_ancestors(&logical).await?;
        self.client
            .create_file(&self.prefix.apply(&logical), contents)
            .await?;
        Ok(())
    }

    async fn write_stream(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(), AdapterError> {
        let logical: String = path::normalize(path);
        tracing::debug!("write_stream: {}", logical);
        self.ensure_ancestors(&logical).await?;
        self.upload_spooled(&logical, reader).await
    }

    async fn update(&self, path: &str, contents: &[u8]) -> Result<(), AdapterError> {
        let logical: String = path::normalize(path);
        self.delete_existing(&logical).await?;
        self.write(&logical, contents).await
    }

    async fn update_stream(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(), AdapterError> {
        let logical: String = path::normalize(path);
        self.delete_existing(&logical).await?;
        self.write_stream(&logical, reader).await
    }

    async fn rename(&self, path: &str, new_path: &str) -> Result<(), AdapterError> {
        let from: String = path::normalize(path);
        let to: String = path::normalize(new_path);
        tracing::debug!("rename: {} -> {}", from, to);
        self.client
            .rename(&self.prefix.apply(&from), &self.prefix.apply(&to))
            .await?;
        Ok(())
    }

    async fn copy(&self, path: &str, new_path: &str) -> Result<(), AdapterError> {
        let from: String = path::normalize(path);
        let to: String = path::normalize(new_path);
        tracing::debug!("copy: {} -> {}", from, to);
        self.client
            .copy(&self.prefix.apply(&from), &self.prefix.apply(&to))
            .await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), AdapterError> {
        let logical: String = path::normalize(path);
        tracing::debug!("delete: {}", logical);
        self.client.delete(&self.prefix.apply(&logical)).await?;
        Ok(())
    }

    async fn delete_directory(&self, path: &str) -> Result<(), AdapterError> {
        let logical: String = path::normalize(path);
        tracing::debug!("delete_directory: {}", logical);
        // Same underlying call as file deletion; the store handles both.
        self.client.delete(&self.prefix.apply(&logical)).await?;
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<(), AdapterError> {
        let logical: String = path::normalize(path);
        if logical.is_empty() {
            return Ok(());
        }
        self.ensure_ancestors(&logical).await?;
        if !self.probe(&logical).await? {
            self.client
                .create_folder(&self.prefix.apply(&logical))
                .await?;
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, AdapterError> {
        let logical: String = path::normalize(path);
        self.probe(&logical).await
    }

    async fn read(&self, path: &str) -> Result<FileContents, AdapterError> {
        let mut result: FileStream = self.read_stream(path).await?;
        let mut contents: Vec<u8> = Vec::new();
        result
            .stream
            .read_to_end(&mut contents)
            .await
            .map_err(|e| AdapterError::io_error(&result.path, e))?;
        Ok(FileContents {
            path: result.path,
            kind: result.kind,
            contents,
        })
    }

    async fn read_stream(&self, path: &str) -> Result<FileStream, AdapterError> {
        let logical: String = path::normalize(path);
        tracing::debug!("read_stream: {}", logical);
        let temp = tempfile::NamedTempFile::new()
            .map_err(|e| AdapterError::io_error(&logical, e))?
            .into_temp_path();
        self.client
            .download(&self.prefix.apply(&logical), &temp)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    AdapterError::not_found(&logical)
                } else {
                    AdapterError::from(err)
                }
            })?;
        let file: tokio::fs::File = tokio::fs::File::open(&temp)
            .await
            .map_err(|e| AdapterError::io_error(&logical, e))?;
        Ok(FileStream {
            path: logical,
            kind: EntryKind::File,
            stream: ContentStream::new(file, temp),
        })
    }

    async fn list_contents(
        &self,
        directory: &str,
        recursive: bool,
    ) -> Result<Vec<FileMetadata>, AdapterError> {
        let logical: String = path::normalize(directory);
        tracing::debug!("list_contents: {} (recursive: {})", logical, recursive);
        let mut visited: HashSet<String> = HashSet::new();
        let mut items: Vec<FileMetadata> = Vec::new();
        self.list_into(logical, recursive, &mut visited, &mut items)
            .await?;
        Ok(items)
    }

    async fn metadata(&self, path: &str) -> Result<FileMetadata, AdapterError> {
        let logical: String = path::normalize(path);
        self.find_entry(&logical).await
    }

    async fn size(&self, path: &str) -> Result<Option<u64>, AdapterError> {
        Ok(self.metadata(path).await?.size)
    }

    fn mime_type(&self, path: &str) -> String {
        mime_for_path(path)
    }

    async fn timestamp(&self, path: &str) -> Result<Option<i64>, AdapterError> {
        Ok(self.metadata(path).await?.modified)
    }
}
