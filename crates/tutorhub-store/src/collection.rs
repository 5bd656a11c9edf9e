//! # JSON Collection
//!
//! One durable collection per entity type: an id-keyed map persisted as a
//! single JSON file, guarded by a `parking_lot` mutex.
//!
//! Read policy is fail-open: a missing or unparsable file loads as an empty
//! collection (a parse failure is logged, then discarded). Write failures
//! are *not* fail-open — they surface as [`StoreError`] so callers can roll
//! back in-memory state.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors arising from durable writes.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to encode collection {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write collection {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// An id-keyed entity collection persisted as a JSON object in one file.
///
/// All access goes through the collection mutex. [`Self::update`] persists
/// before releasing the lock, so each logical operation is an atomic
/// read-modify-write on this collection. Cross-collection transactions use
/// [`Self::lock`] and persist explicitly while holding both guards.
pub struct JsonCollection<T> {
    path: PathBuf,
    inner: Mutex<HashMap<String, T>>,
}

impl<T: Serialize + DeserializeOwned> JsonCollection<T> {
    /// Open a collection backed by `path`, loading its current contents.
    ///
    /// A missing file is a normal first boot. A file that exists but fails
    /// to parse is treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let inner = Mutex::new(Self::load_or_empty(&path));
        Self { path, inner }
    }

    fn load_or_empty(path: &Path) -> HashMap<String, T> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %err, "collection unreadable, starting empty");
                }
                return HashMap::new();
            }
        };
        match serde_json::from_slice::<BTreeMap<String, T>>(&bytes) {
            Ok(map) => map.into_iter().collect(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "collection corrupt, starting empty");
                HashMap::new()
            }
        }
    }

    /// Acquire the collection lock for a multi-step critical section.
    pub fn lock(&self) -> CollectionGuard<'_, T> {
        CollectionGuard {
            map: self.inner.lock(),
            path: &self.path,
        }
    }

    /// Run a read-only closure under the collection lock.
    pub fn read<R>(&self, f: impl FnOnce(&HashMap<String, T>) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run a mutating closure under the collection lock, persisting the
    /// result before the lock is released.
    pub fn update<R>(&self, f: impl FnOnce(&mut HashMap<String, T>) -> R) -> Result<R, StoreError> {
        let mut guard = self.lock();
        let result = f(&mut guard);
        guard.persist()?;
        Ok(result)
    }
}

/// Held collection lock. Derefs to the underlying map; durable state only
/// changes when [`Self::persist`] is called.
pub struct CollectionGuard<'a, T> {
    map: MutexGuard<'a, HashMap<String, T>>,
    path: &'a Path,
}

impl<T: Serialize> CollectionGuard<'_, T> {
    /// Write the current map to disk, keys ordered, via a temp-file rename.
    pub fn persist(&self) -> Result<(), StoreError> {
        let ordered: BTreeMap<&String, &T> = self.map.iter().collect();
        let bytes = serde_json::to_vec_pretty(&ordered).map_err(|source| StoreError::Encode {
            path: self.path.to_path_buf(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        let write = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, self.path));
        write.map_err(|source| StoreError::Write {
            path: self.path.to_path_buf(),
            source,
        })
    }
}

impl<T> Deref for CollectionGuard<'_, T> {
    type Target = HashMap<String, T>;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<T> DerefMut for CollectionGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.map
    }
}
