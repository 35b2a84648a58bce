//! Integration tests for the filesystem adapter.
//!
//! These tests drive the adapter against the in-memory reference store plus
//! two purpose-built doubles: a call-recording wrapper (to observe the
//! order of store operations) and an always-failing store (to verify error
//! propagation).

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use cloudfs_adapter::{AdapterError, FilesystemAdapter, RemoteStoreAdapter, Visibility};
use cloudfs_store::{MemoryRemoteStore, RemoteEntry, RemoteStore, StoreError};

// ============================================================================
// Test Infrastructure
// ============================================================================

/// Store wrapper that records every call in order before delegating.
struct RecordingStore {
    inner: MemoryRemoteStore,
    calls: Mutex<Vec<String>>,
}

impl RecordingStore {
    fn new() -> Self {
        Self {
            inner: MemoryRemoteStore::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Index of the first recorded call equal to `call`.
    fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }
}

#[async_trait]
impl RemoteStore for RecordingStore {
    async fn create_file(&self, path: &str, contents: &[u8]) -> Result<(), StoreError> {
        self.record(format!("create_file {}", path));
        self.inner.create_file(path, contents).await
    }

    async fn upload(&self, local: &Path, path: &str) -> Result<(), StoreError> {
        self.record(format!("upload {}", path));
        self.inner.upload(local, path).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.record(format!("delete {}", path));
        self.inner.delete(path).await
    }

    async fn rename(&self, path: &str, new_path: &str) -> Result<(), StoreError> {
        self.record(format!("rename {} {}", path, new_path));
        self.inner.rename(path, new_path).await
    }

    async fn copy(&self, path: &str, new_path: &str) -> Result<(), StoreError> {
        self.record(format!("copy {} {}", path, new_path));
        self.inner.copy(path, new_path).await
    }

    async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        self.record(format!("create_folder {}", path));
        self.inner.create_folder(path).await
    }

    async fn list_files(&self, directory: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        self.record(format!("list_files {}", directory));
        self.inner.list_files(directory).await
    }

    async fn download(&self, path: &str, destination: &Path) -> Result<(), StoreError> {
        self.record(format!("download {}", path));
        self.inner.download(path, destination).await
    }
}

/// Store whose every operation fails with a transport error.
struct FailingStore;

impl FailingStore {
    fn fail(path: &str) -> StoreError {
        StoreError::transport(path, "injected failure")
    }
}

#[async_trait]
impl RemoteStore for FailingStore {
    async fn create_file(&self, path: &str, _contents: &[u8]) -> Result<(), StoreError> {
        Err(Self::fail(path))
    }

    async fn upload(&self, _local: &Path, path: &str) -> Result<(), StoreError> {
        Err(Self::fail(path))
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        Err(Self::fail(path))
    }

    async fn rename(&self, path: &str, _new_path: &str) -> Result<(), StoreError> {
        Err(Self::fail(path))
    }

    async fn copy(&self, path: &str, _new_path: &str) -> Result<(), StoreError> {
        Err(Self::fail(path))
    }

    async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        Err(Self::fail(path))
    }

    async fn list_files(&self, directory: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        Err(Self::fail(directory))
    }

    async fn download(&self, path: &str, _destination: &Path) -> Result<(), StoreError> {
        Err(Self::fail(path))
    }
}

fn memory_adapter() -> RemoteStoreAdapter<MemoryRemoteStore> {
    RemoteStoreAdapter::new(MemoryRemoteStore::new())
}

// ============================================================================
// Absence and Existence
// ============================================================================

#[tokio::test]
async fn test_missing_paths_report_not_found_not_generic_errors() {
    let fs = memory_adapter();

    assert!(!fs.exists("missing.txt").await.unwrap());
    assert!(fs.read("missing.txt").await.unwrap_err().is_not_found());
    assert!(fs
        .read_stream("missing.txt")
        .await
        .unwrap_err()
        .is_not_found());
    assert!(fs.metadata("missing.txt").await.unwrap_err().is_not_found());
    assert!(fs.size("missing.txt").await.unwrap_err().is_not_found());
    assert!(fs
        .timestamp("missing.txt")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_exists_reraises_transport_errors() {
    // Existence probes convert absence to false, nothing else.
    let fs = RemoteStoreAdapter::new(FailingStore);
    let err: AdapterError = fs.exists("any/path.txt").await.unwrap_err();
    assert!(matches!(err, AdapterError::Store(_)));
}

// ============================================================================
// Write, Read, Update
// ============================================================================

#[tokio::test]
async fn test_write_read_round_trip_with_metadata() {
    // Root-level write into a store with no directories at all.
    let fs = memory_adapter();
    fs.write("report.csv", b"a,b\n1,2\n").await.unwrap();

    let file = fs.read("report.csv").await.unwrap();
    assert_eq!(file.contents, b"a,b\n1,2\n");
    assert_eq!(file.path, "report.csv");

    let meta = fs.metadata("report.csv").await.unwrap();
    assert_eq!(meta.size, Some(8));
    assert!(!meta.is_dir());
    assert_eq!(meta.mime_type.as_deref(), Some("text/csv"));
    assert_eq!(fs.size("report.csv").await.unwrap(), Some(8));
    assert!(fs.timestamp("report.csv").await.unwrap().is_some());
}

#[tokio::test]
async fn test_root_level_write_creates_no_directories() {
    let store = RecordingStore::new();
    let fs = RemoteStoreAdapter::new(store);
    fs.write("report.csv", b"a,b\n1,2\n").await.unwrap();

    let folder_calls: Vec<String> = fs
        .client()
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("create_folder"))
        .collect();
    assert!(folder_calls.is_empty());
}

#[tokio::test]
async fn test_write_creates_ancestors_top_down() {
    let store = RecordingStore::new();
    let fs = RemoteStoreAdapter::new(store);
    fs.write("archive/2024/jan.log", b"line\n").await.unwrap();

    // Every ancestor now exists.
    assert!(fs.exists("archive").await.unwrap());
    assert!(fs.exists("archive/2024").await.unwrap());
    assert!(fs.exists("archive/2024/jan.log").await.unwrap());

    // And they were created shallow to deep, before the upload.
    let archive = fs.client().position("create_folder archive").unwrap();
    let deeper = fs.client().position("create_folder archive/2024").unwrap();
    let upload = fs
        .client()
        .position("create_file archive/2024/jan.log")
        .unwrap();
    assert!(archive < deeper);
    assert!(deeper < upload);
}

#[tokio::test]
async fn test_write_reuses_existing_ancestors() {
    let store = RecordingStore::new();
    let fs = RemoteStoreAdapter::new(store);
    fs.create_directory("archive").await.unwrap();
    fs.write("archive/feb.log", b"x").await.unwrap();

    let folder_calls: Vec<String> = fs
        .client()
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("create_folder"))
        .collect();
    assert_eq!(folder_calls, vec!["create_folder archive"]);
}

#[tokio::test]
async fn test_write_stream_round_trips_through_spool() {
    let fs = memory_adapter();
    let mut reader: &[u8] = b"streamed payload";
    fs.write_stream("blobs/data.bin", &mut reader).await.unwrap();

    let file = fs.read("blobs/data.bin").await.unwrap();
    assert_eq!(file.contents, b"streamed payload");
}

#[tokio::test]
async fn test_update_replaces_content() {
    let fs = memory_adapter();
    fs.write("note.txt", b"old").await.unwrap();
    fs.update("note.txt", b"new content").await.unwrap();

    let file = fs.read("note.txt").await.unwrap();
    assert_eq!(file.contents, b"new content");
}

#[tokio::test]
async fn test_update_tolerates_missing_path() {
    // The delete step of delete-then-write treats absence as a no-op.
    let fs = memory_adapter();
    fs.update("fresh.txt", b"first").await.unwrap();
    assert_eq!(fs.read("fresh.txt").await.unwrap().contents, b"first");
}

#[tokio::test]
async fn test_update_stream_replaces_content() {
    let fs = memory_adapter();
    fs.write("doc.txt", b"old").await.unwrap();
    let mut reader: &[u8] = b"replacement";
    fs.update_stream("doc.txt", &mut reader).await.unwrap();

    assert_eq!(fs.read("doc.txt").await.unwrap().contents, b"replacement");
}

// ============================================================================
// Streaming Reads
// ============================================================================

#[tokio::test]
async fn test_read_stream_returns_full_content() {
    use tokio::io::AsyncReadExt;

    let fs = memory_adapter();
    fs.write("media/clip.bin", &[7u8; 1024]).await.unwrap();

    let mut result = fs.read_stream("media/clip.bin").await.unwrap();
    let mut contents: Vec<u8> = Vec::new();
    result.stream.read_to_end(&mut contents).await.unwrap();
    assert_eq!(contents, vec![7u8; 1024]);
    assert_eq!(result.path, "media/clip.bin");
}

// ============================================================================
// Listing
// ============================================================================

async fn seeded_tree() -> RemoteStoreAdapter<MemoryRemoteStore> {
    let fs = memory_adapter();
    fs.write("a/f1.txt", b"1").await.unwrap();
    fs.write("a/b/f2.txt", b"2").await.unwrap();
    fs.write("c.txt", b"3").await.unwrap();
    fs
}

#[tokio::test]
async fn test_list_contents_non_recursive_returns_immediate_children_only() {
    let fs = seeded_tree().await;

    let items = fs.list_contents("", false).await.unwrap();
    let paths: Vec<&str> = items.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, vec!["a", "c.txt"]);
    assert!(items[0].is_dir());
}

#[tokio::test]
async fn test_list_contents_recursive_is_depth_first_without_duplicates() {
    let fs = seeded_tree().await;

    let items = fs.list_contents("", true).await.unwrap();
    let paths: Vec<&str> = items.iter().map(|m| m.path.as_str()).collect();
    // Each directory entry is immediately followed by its expansion.
    assert_eq!(paths, vec!["a", "a/b", "a/b/f2.txt", "a/f1.txt", "c.txt"]);

    let mut deduped: Vec<&str> = paths.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), paths.len());
}

#[tokio::test]
async fn test_list_contents_of_empty_directory_is_empty() {
    let fs = memory_adapter();
    fs.create_directory("empty").await.unwrap();

    let items = fs.list_contents("empty", true).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_list_contents_of_missing_directory_propagates_not_found() {
    let fs = memory_adapter();
    assert!(fs
        .list_contents("ghost", false)
        .await
        .unwrap_err()
        .is_not_found());
}

// ============================================================================
// Rename, Copy, Delete
// ============================================================================

#[tokio::test]
async fn test_rename_moves_and_copy_duplicates() {
    let fs = memory_adapter();
    fs.write("a.txt", b"data").await.unwrap();

    fs.rename("a.txt", "b.txt").await.unwrap();
    assert!(!fs.exists("a.txt").await.unwrap());
    assert_eq!(fs.read("b.txt").await.unwrap().contents, b"data");

    fs.copy("b.txt", "c.txt").await.unwrap();
    assert_eq!(fs.read("b.txt").await.unwrap().contents, b"data");
    assert_eq!(fs.read("c.txt").await.unwrap().contents, b"data");

    assert!(fs.rename("ghost.txt", "x.txt").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_file_and_directory() {
    let fs = memory_adapter();
    fs.write("docs/a.txt", b"1").await.unwrap();
    fs.write("docs/sub/b.txt", b"2").await.unwrap();

    fs.delete("docs/a.txt").await.unwrap();
    assert!(!fs.exists("docs/a.txt").await.unwrap());

    fs.delete_directory("docs").await.unwrap();
    assert!(!fs.exists("docs").await.unwrap());
    assert!(!fs.exists("docs/sub/b.txt").await.unwrap());

    assert!(fs.delete("docs/a.txt").await.unwrap_err().is_not_found());
}

// ============================================================================
// MIME Types
// ============================================================================

#[tokio::test]
async fn test_mime_type_depends_only_on_the_extension() {
    let fs = memory_adapter();
    // The store has no file at any of these paths.
    assert_eq!(fs.mime_type("a.txt"), "text/plain");
    assert_eq!(fs.mime_type("deep/dir/report.csv"), "text/csv");
    assert_eq!(fs.mime_type("no_extension"), "application/octet-stream");
}

// ============================================================================
// Visibility
// ============================================================================

#[tokio::test]
async fn test_visibility_operations_fail_unsupported() {
    let fs = memory_adapter();
    fs.write("a.txt", b"x").await.unwrap();

    assert!(matches!(
        fs.set_visibility("a.txt", Visibility::Private).await,
        Err(AdapterError::Unsupported { .. })
    ));
    assert!(matches!(
        fs.visibility("a.txt").await,
        Err(AdapterError::Unsupported { .. })
    ));
}

// ============================================================================
// Path Prefix
// ============================================================================

#[tokio::test]
async fn test_prefixed_adapter_confines_traffic_and_strips_listings() {
    let store = MemoryRemoteStore::new();
    store.create_folder("app").await.unwrap();
    let fs = RemoteStoreAdapter::new(store).with_prefix("app");

    fs.write("notes/x.txt", b"hello").await.unwrap();

    // Store-side paths carry the prefix.
    assert_eq!(
        fs.client().paths(),
        vec!["app", "app/notes", "app/notes/x.txt"]
    );

    // The adapter surface stays logical.
    assert!(fs.exists("notes/x.txt").await.unwrap());
    assert_eq!(fs.read("notes/x.txt").await.unwrap().contents, b"hello");

    let items = fs.list_contents("", true).await.unwrap();
    let paths: Vec<&str> = items.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, vec!["notes", "notes/x.txt"]);

    let meta = fs.metadata("notes/x.txt").await.unwrap();
    assert_eq!(meta.path, "notes/x.txt");
    assert_eq!(meta.size, Some(5));
}
