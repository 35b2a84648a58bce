//! In-memory remote store for tests and local development.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::traits::RemoteStore;
use crate::types::{EntryKind, RemoteEntry};

/// A node in the in-memory tree.
#[derive(Debug, Clone)]
enum Node {
    File { data: Vec<u8>, modified: i64 },
    Folder { modified: i64 },
}

/// In-memory remote store.
///
/// Keeps a flat path-to-node map guarded by a mutex. Modification times come
/// from a logical clock that ticks once per mutation, so listings stay
/// deterministic under test. Parent folders must exist before anything can
/// be created under them; the root (`""`) always exists. Rename and copy
/// destinations must not already exist.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    nodes: Mutex<HashMap<String, Node>>,
    clock: AtomicI64,
}

impl MemoryRemoteStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored paths, sorted (for assertions in tests).
    pub fn paths(&self) -> Vec<String> {
        let nodes = self.nodes.lock().unwrap();
        let mut paths: Vec<String> = nodes.keys().cloned().collect();
        paths.sort();
        paths
    }

    fn tick(&self) -> i64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|seg| !seg.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn parent_of(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// Verify that the parent folder of `path` exists in `nodes`.
fn check_parent(nodes: &HashMap<String, Node>, path: &str) -> Result<(), StoreError> {
    let parent: &str = parent_of(path);
    if parent.is_empty() {
        return Ok(());
    }
    match nodes.get(parent) {
        Some(Node::Folder { .. }) => Ok(()),
        Some(Node::File { .. }) => Err(StoreError::transport(parent, "parent is a file")),
        None => Err(StoreError::not_found(parent)),
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn create_file(&self, path: &str, contents: &[u8]) -> Result<(), StoreError> {
        let path: String = normalize(path);
        if path.is_empty() {
            return Err(StoreError::transport(path, "cannot write to the root"));
        }
        let modified: i64 = self.tick();
        let mut nodes = self.nodes.lock().unwrap();
        check_parent(&nodes, &path)?;
        if let Some(Node::Folder { .. }) = nodes.get(&path) {
            return Err(StoreError::transport(path, "a folder exists at this path"));
        }
        nodes.insert(
            path,
            Node::File {
                data: contents.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    async fn upload(&self, local: &Path, path: &str) -> Result<(), StoreError> {
        let data: Vec<u8> = tokio::fs::read(local)
            .await
            .map_err(|e| StoreError::io_error(local.display().to_string(), e))?;
        self.create_file(path, &data).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let path: String = normalize(path);
        let mut nodes = self.nodes.lock().unwrap();
        match nodes.remove(&path) {
            Some(Node::File { .. }) => Ok(()),
            Some(Node::Folder { .. }) => {
                let prefix: String = format!("{}/", path);
                nodes.retain(|key, _| !key.starts_with(&prefix));
                Ok(())
            }
            None => Err(StoreError::not_found(path)),
        }
    }

    async fn rename(&self, path: &str, new_path: &str) -> Result<(), StoreError> {
        let old: String = normalize(path);
        let new: String = normalize(new_path);
        let mut nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(&old) {
            return Err(StoreError::not_found(old));
        }
        if old == new {
            return Ok(());
        }
        if nodes.contains_key(&new) {
            return Err(StoreError::transport(new, "destination already exists"));
        }
        check_parent(&nodes, &new)?;
        let prefix: String = format!("{}/", old);
        let moved: Vec<String> = nodes
            .keys()
            .filter(|key| **key == old || key.starts_with(&prefix))
            .cloned()
            .collect();
        for key in moved {
            if let Some(node) = nodes.remove(&key) {
                let rekeyed: String = format!("{}{}", new, &key[old.len()..]);
                nodes.insert(rekeyed, node);
            }
        }
        Ok(())
    }

    async fn copy(&self, path: &str, new_path: &str) -> Result<(), StoreError> {
        let src: String = normalize(path);
        let dst: String = normalize(new_path);
        let modified: i64 = self.tick();
        let mut nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(&src) {
            return Err(StoreError::not_found(src));
        }
        if src == dst {
            return Ok(());
        }
        if nodes.contains_key(&dst) {
            return Err(StoreError::transport(dst, "destination already exists"));
        }
        check_parent(&nodes, &dst)?;
        let prefix: String = format!("{}/", src);
        let copied: Vec<(String, Node)> = nodes
            .iter()
            .filter(|(key, _)| **key == src || key.starts_with(&prefix))
            .map(|(key, node)| {
                let rekeyed: String = format!("{}{}", dst, &key[src.len()..]);
                let mut node: Node = node.clone();
                match &mut node {
                    Node::File { modified: m, .. } | Node::Folder { modified: m } => *m = modified,
                }
                (rekeyed, node)
            })
            .collect();
        for (key, node) in copied {
            nodes.insert(key, node);
        }
        Ok(())
    }

    async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        let path: String = normalize(path);
        if path.is_empty() {
            // The root always exists.
            return Ok(());
        }
        let modified: i64 = self.tick();
        let mut nodes = self.nodes.lock().unwrap();
        check_parent(&nodes, &path)?;
        match nodes.get(&path) {
            Some(Node::Folder { .. }) => Ok(()),
            Some(Node::File { .. }) => Err(StoreError::transport(path, "a file exists at this path")),
            None => {
                nodes.insert(path, Node::Folder { modified });
                Ok(())
            }
        }
    }

    async fn list_files(&self, directory: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        let directory: String = normalize(directory);
        let nodes = self.nodes.lock().unwrap();
        if !directory.is_empty() {
            match nodes.get(&directory) {
                Some(Node::Folder { .. }) => {}
                Some(Node::File { .. }) => {
                    return Err(StoreError::transport(directory, "not a folder"))
                }
                None => return Err(StoreError::not_found(directory)),
            }
        }
        let mut entries: Vec<RemoteEntry> = nodes
            .iter()
            .filter(|(key, _)| parent_of(key) == directory)
            .map(|(key, node)| match node {
                Node::File { data, modified } => RemoteEntry {
                    name: name_of(key).to_string(),
                    path: key.clone(),
                    kind: EntryKind::File,
                    size: Some(data.len() as u64),
                    modified: Some(*modified),
                },
                Node::Folder { modified } => RemoteEntry {
                    name: name_of(key).to_string(),
                    path: key.clone(),
                    kind: EntryKind::Folder,
                    size: None,
                    modified: Some(*modified),
                },
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn download(&self, path: &str, destination: &Path) -> Result<(), StoreError> {
        let path: String = normalize(path);
        let data: Vec<u8> = {
            let nodes = self.nodes.lock().unwrap();
            match nodes.get(&path) {
                Some(Node::File { data, .. }) => data.clone(),
                Some(Node::Folder { .. }) => {
                    return Err(StoreError::transport(path, "not a file"))
                }
                None => return Err(StoreError::not_found(path)),
            }
        };
        tokio::fs::write(destination, data)
            .await
            .map_err(|e| StoreError::io_error(destination.display().to_string(), e))
    }
}
