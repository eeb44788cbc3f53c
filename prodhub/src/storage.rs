//! Picks the storage backend for a run.

use std::path::PathBuf;
use std::sync::Arc;

use prodhub_core::store::{FileStore, InMemoryStore, KvStore};

use crate::config::HubConfig;

/// The opened backend and where it keeps its data.
pub struct Storage {
    /// The backend shared by the to-do and alarm lists.
    pub store: Arc<dyn KvStore>,
    /// Data directory, or `None` when nothing survives the process.
    pub location: Option<PathBuf>,
}

impl Storage {
    /// Open the backend selected by `config`.
    ///
    /// Falls back to memory, with a warning, when no data directory is
    /// known or it cannot be created.
    #[must_use]
    pub fn open(config: &HubConfig) -> Self {
        if config.in_memory {
            tracing::info!("using in-memory storage");
            return Self::in_memory();
        }
        let Some(dir) = config.data_dir.as_ref() else {
            tracing::warn!("no data directory available, using in-memory storage");
            return Self::in_memory();
        };
        match FileStore::open(dir) {
            Ok(store) => {
                tracing::info!(dir = %store.dir().display(), "using file storage");
                Self {
                    location: Some(store.dir().to_path_buf()),
                    store: Arc::new(store),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "data directory unusable, using in-memory storage");
                Self::in_memory()
            }
        }
    }

    /// A fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            location: None,
        }
    }

    /// Whether changes survive a restart.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.location.is_some()
    }
}
