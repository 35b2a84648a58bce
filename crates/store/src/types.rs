//! Listing types returned by remote stores.

/// Kind of a remote entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Folder.
    Folder,
}

impl EntryKind {
    /// True for folders.
    pub fn is_folder(self) -> bool {
        self == EntryKind::Folder
    }
}

/// A single entry from a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Entry name within its directory.
    pub name: String,
    /// Full path of the entry as the store addresses it.
    pub path: String,
    /// File or folder.
    pub kind: EntryKind,
    /// Size in bytes (files only; stores may omit it).
    pub size: Option<u64>,
    /// Last modified timestamp (Unix epoch seconds).
    pub modified: Option<i64>,
}
