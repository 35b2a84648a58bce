//! Filesystem metadata model.

use cloudfs_store::{EntryKind, RemoteEntry};
use serde::Serialize;

use crate::mime::mime_for_path;

/// Metadata for a single filesystem entry.
///
/// Derived per call from a remote directory listing; never cached by the
/// adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    /// Logical path of the entry.
    pub path: String,
    /// File or directory.
    #[serde(rename = "type", serialize_with = "serialize_kind")]
    pub kind: EntryKind,
    /// Size in bytes (files only).
    pub size: Option<u64>,
    /// Last modified timestamp (Unix epoch seconds).
    pub modified: Option<i64>,
    /// MIME type guessed from the extension (files only).
    pub mime_type: Option<String>,
}

impl FileMetadata {
    /// Build metadata from a listing entry, using `path` as the logical path.
    pub fn from_entry(entry: &RemoteEntry, path: impl Into<String>) -> Self {
        let path: String = path.into();
        let mime_type: Option<String> = match entry.kind {
            EntryKind::File => Some(mime_for_path(&path)),
            EntryKind::Folder => None,
        };
        Self {
            path,
            kind: entry.kind,
            size: entry.size,
            modified: entry.modified,
            mime_type,
        }
    }

    /// True for directory entries.
    pub fn is_dir(&self) -> bool {
        self.kind.is_folder()
    }
}

fn serialize_kind<S: serde::Serializer>(kind: &EntryKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if kind.is_folder() { "dir" } else { "file" })
}
