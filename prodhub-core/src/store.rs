//! Namespaced key-value persistence and the list store built on it.
//!
//! [`KvStore`] is the pluggable backend: one opaque byte blob per
//! namespace. [`FileStore`] keeps each namespace in its own JSON file,
//! [`InMemoryStore`] keeps everything in a map for tests and for
//! environments without durable storage.
//!
//! [`ListStore`] serializes an ordered list of records into one
//! namespace. Its [`load`](ListStore::load) and [`save`](ListStore::save)
//! never fail: errors are logged and the in-memory list stays
//! authoritative for the rest of the session.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Namespace holding the to-do list.
pub const TODOS_NAMESPACE: &str = "todos";

/// Namespace holding the alarm list.
pub const ALARMS_NAMESPACE: &str = "alarms";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend cannot be used at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A read from the backend failed.
    #[error("read failed for {namespace}: {source}")]
    ReadFailed {
        /// Namespace being read.
        namespace: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A write to the backend failed.
    #[error("write failed for {namespace}: {source}")]
    WriteFailed {
        /// Namespace being written.
        namespace: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Stored bytes are not a valid record list.
    #[error("corrupt data in {namespace}: {source}")]
    Corrupt {
        /// Namespace holding the bad data.
        namespace: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// Records could not be encoded.
    #[error("encode failed for {namespace}: {source}")]
    Encode {
        /// Namespace being written.
        namespace: String,
        /// Underlying encode error.
        source: serde_json::Error,
    },
}

/// A namespaced byte store.
///
/// Implementations are synchronous; the data volume is tens of records.
pub trait KvStore: Send + Sync {
    /// Read the blob stored under `namespace`, or `None` if nothing was
    /// ever written there.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, namespace: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the blob stored under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn put(&self, namespace: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// In-memory [`KvStore`]. Nothing survives the process.
#[derive(Default)]
pub struct InMemoryStore {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, namespace: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.slots.lock().get(namespace).cloned())
    }

    fn put(&self, namespace: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.slots
            .lock()
            .insert(namespace.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// [`KvStore`] backed by a directory with one `<namespace>.json` file
/// per namespace.
///
/// Writes go to a sibling temporary file that is renamed over the
/// target, so a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the directory cannot be
    /// created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the namespace files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, namespace: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.path_for(namespace)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::ReadFailed {
                namespace: namespace.to_string(),
                source,
            }),
        }
    }

    fn put(&self, namespace: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let target = self.path_for(namespace);
        let staging = self.dir.join(format!(".{namespace}.json.tmp"));
        let write_failed = |source| StoreError::WriteFailed {
            namespace: namespace.to_string(),
            source,
        };
        std::fs::write(&staging, bytes).map_err(write_failed)?;
        std::fs::rename(&staging, &target).map_err(write_failed)
    }
}

/// An ordered list of `T` persisted as a JSON array in one namespace.
pub struct ListStore<T> {
    backend: Arc<dyn KvStore>,
    namespace: String,
    _records: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> ListStore<T> {
    /// Bind a list to `namespace` in `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn KvStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            _records: PhantomData,
        }
    }

    /// Namespace this list is stored under.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Read the stored list. A namespace never written to is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails or the stored
    /// bytes do not decode.
    pub fn try_load(&self) -> Result<Vec<T>, StoreError> {
        let Some(bytes) = self.backend.get(&self.namespace)? else {
            return Ok(Vec::new());
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            namespace: self.namespace.clone(),
            source,
        })
    }

    /// Replace the stored list with `records`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or the backend write fails.
    pub fn try_save(&self, records: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(records).map_err(|source| StoreError::Encode {
            namespace: self.namespace.clone(),
            source,
        })?;
        self.backend.put(&self.namespace, &bytes)
    }

    /// Read the stored list, treating any failure as an empty list.
    #[must_use]
    pub fn load(&self) -> Vec<T> {
        match self.try_load() {
            Ok(records) => {
                tracing::debug!(namespace = self.namespace(), count = records.len(), "loaded list");
                records
            }
            Err(err) => {
                tracing::warn!(
                    namespace = self.namespace(),
                    error = %err,
                    "failed to load list, starting empty"
                );
                Vec::new()
            }
        }
    }

    /// Write `records`, logging (and otherwise ignoring) any failure.
    ///
    /// Returns whether the write went through.
    pub fn save(&self, records: &[T]) -> bool {
        if let Err(err) = self.try_save(records) {
            tracing::warn!(
                namespace = self.namespace(),
                error = %err,
                "failed to save list, change kept in memory only"
            );
            return false;
        }
        true
    }
}
