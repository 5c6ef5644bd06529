//! Ordered byte key-value store used by the name registry.
//!
//! The registry only needs get/set/delete and ascending prefix iteration from
//! its host store. [`MemoryStore`] backs tests and ephemeral nodes,
//! [`SledStore`] persists to disk.

use parking_lot::RwLock;
use sled::{Db, Tree};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Empty key")]
    EmptyKey,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Key/value pair yielded by [`KvStore::prefix_iter`].
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Lazy iterator over a key range. Each call to `prefix_iter` produces a new
/// one; it never shares a cursor with other callers.
pub type KvIter<'a> = Box<dyn Iterator<Item = Result<KvPair>> + 'a>;

/// Abstract key-value store
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;
    /// Removing a missing key is not an error.
    fn delete(&self, key: &[u8]) -> Result<()>;
    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
    /// All entries whose key starts with `prefix`, in ascending byte order.
    fn prefix_iter<'a>(&'a self, prefix: &[u8]) -> KvIter<'a>;
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(StorageError::EmptyKey);
    }
    Ok(())
}

/// Attempts made while another handle in this process still holds the sled lock.
const LOCK_RETRIES: u32 = 20;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(50);

fn is_lock_contention(err: &sled::Error) -> bool {
    matches!(err, sled::Error::Io(io) if io.to_string().contains("could not acquire lock"))
}

fn open_db(path: &Path) -> Result<Db> {
    let mut attempt = 0;
    loop {
        match sled::open(path) {
            Err(err) if is_lock_contention(&err) && attempt < LOCK_RETRIES => {
                attempt += 1;
                warn!(
                    target: "storage",
                    "Sled store at {} is still locked, retry {}/{}",
                    path.display(),
                    attempt,
                    LOCK_RETRIES
                );
                thread::sleep(LOCK_RETRY_DELAY);
            }
            other => return Ok(other?),
        }
    }
}

/// Sled-backed implementation. Pending writes are flushed when a handle drops.
#[derive(Clone)]
pub struct SledStore {
    db: Db,
    tree: Tree,
}

impl SledStore {
    /// Open (or create) the database at `path` and use the tree named `tree`.
    pub fn new<P: AsRef<Path>>(path: P, tree: &str) -> Result<Self> {
        let db = open_db(path.as_ref())?;
        let tree = db.open_tree(tree)?;
        tracing::info!(
            target: "storage",
            "Opened sled store at {} ({} entries)",
            path.as_ref().display(),
            tree.len()
        );
        Ok(Self { db, tree })
    }

    /// Throwaway database removed on drop.
    pub fn temporary(tree: &str) -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        let tree = db.open_tree(tree)?;
        Ok(Self { db, tree })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl Drop for SledStore {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            warn!(target: "storage", "Failed to flush sled store on drop: {}", err);
        }
    }
}

impl KvStore for SledStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.tree.get(key)?.map(|v| v.to_vec()))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        check_key(key)?;
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.tree.remove(key)?;
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.tree.contains_key(key)?)
    }

    fn prefix_iter<'a>(&'a self, prefix: &[u8]) -> KvIter<'a> {
        Box::new(self.tree.scan_prefix(prefix).map(|entry| {
            let (k, v) = entry?;
            Ok((k.to_vec(), v.to_vec()))
        }))
    }
}

/// In-memory backend. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        check_key(key)?;
        self.entries.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn prefix_iter<'a>(&'a self, prefix: &[u8]) -> KvIter<'a> {
        // Each step re-seeks past the last yielded key; no guard outlives a step.
        let prefix = prefix.to_vec();
        let mut cursor = Bound::Included(prefix.clone());
        Box::new(std::iter::from_fn(move || {
            let entries = self.entries.read();
            let (key, value) = entries
                .range((cursor.clone(), Bound::Unbounded))
                .next()
                .filter(|(key, _)| key.starts_with(&prefix))?;
            cursor = Bound::Excluded(key.clone());
            Some(Ok((key.clone(), value.clone())))
        }))
    }
}
