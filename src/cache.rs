use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use log::{debug, warn};

use crate::data::model::Dataset;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Keys and file signatures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub adapt_for_map_widget: bool,
}

/// Identity of a file's content as seen through its metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileSignature {
    /// `None` when the file's metadata is unreadable (usually: it does not exist).
    pub fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(FileSignature {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

type Slot = Arc<Mutex<Option<Arc<Dataset>>>>;

struct Entry {
    signature: FileSignature,
    slot: Slot,
}

// ---------------------------------------------------------------------------
// DatasetCache
// ---------------------------------------------------------------------------

/// Memo of computed datasets keyed by `(path, adapt_for_map_widget)`.
///
/// Concurrent callers with the same key share one computation: the map lock
/// only hands out a per-key slot, the first caller to lock the slot computes
/// and the others block on it. An entry is replaced when the file's signature
/// changes. A failed computation leaves the slot empty, so the next caller
/// (including one that was waiting) computes again.
#[derive(Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `key`, or run `compute` and cache its
    /// success.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        let Some(signature) = FileSignature::of(&key.path) else {
            debug!("no signature for {}, bypassing cache", key.path.display());
            return compute().map(Arc::new);
        };

        let slot = self.slot_for(key, signature);
        let mut guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(dataset) = guard.as_ref() {
            debug!("cache hit");
            return Ok(Arc::clone(dataset));
        }

        debug!("cache miss");
        let dataset = Arc::new(compute()?);
        *guard = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop every cached dataset.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of keys with a cached dataset.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| match entry.slot.try_lock() {
                Ok(slot) => slot.is_some(),
                // being computed right now
                Err(_) => false,
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_for(&self, key: CacheKey, signature: FileSignature) -> Slot {
        let mut entries = self.lock();
        let fresh = || Entry {
            signature,
            slot: Arc::new(Mutex::new(None)),
        };
        let entry = entries.entry(key).or_insert_with(fresh);
        if entry.signature != signature {
            warn!("file changed since it was cached, reloading");
            *entry = fresh();
        }
        Arc::clone(&entry.slot)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
