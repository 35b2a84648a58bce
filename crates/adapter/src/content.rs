//! Read results and temp-file-backed content streams.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use cloudfs_store::EntryKind;
use tempfile::TempPath;
use tokio::io::{AsyncRead, ReadBuf};

/// Fully buffered read result.
#[derive(Debug, Clone, PartialEq)]
pub struct FileContents {
    /// Logical path the content was read from.
    pub path: String,
    /// Kind of the entry (always a file).
    pub kind: EntryKind,
    /// The file's bytes.
    pub contents: Vec<u8>,
}

/// Streaming read result.
#[derive(Debug)]
pub struct FileStream {
    /// Logical path the stream was opened for.
    pub path: String,
    /// Kind of the entry (always a file).
    pub kind: EntryKind,
    /// Reader positioned at the start of the content.
    pub stream: ContentStream,
}

/// Readable stream over downloaded content.
///
/// Backed by a temporary file that is unlinked when the stream is dropped,
/// whichever way the caller exits. Single-use and forward-only.
#[derive(Debug)]
pub struct ContentStream {
    file: tokio::fs::File,
    _temp: TempPath,
}

impl ContentStream {
    /// Wrap an open file handle together with its temp-path guard.
    pub(crate) fn new(file: tokio::fs::File, temp: TempPath) -> Self {
        Self { file, _temp: temp }
    }
}

impl AsyncRead for ContentStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().file).poll_read(cx, buf)
    }
}
