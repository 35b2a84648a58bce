//! Remote store capability for path-addressed cloud backends.
//!
//! This crate defines the [`RemoteStore`] trait consumed by the filesystem
//! adapter crate, the [`StoreError`] taxonomy that distinguishes absence
//! from transport failures, and the listing types returned by directory
//! enumeration.
//!
//! Real backends wrap an actual cloud client and own its transport, retry,
//! and consistency behavior. An in-memory reference implementation
//! ([`MemoryRemoteStore`]) is shipped for tests and local development.

mod error;
mod memory;
mod traits;
mod types;

pub use error::StoreError;
pub use memory::MemoryRemoteStore;
pub use traits::RemoteStore;
pub use types::{EntryKind, RemoteEntry};
