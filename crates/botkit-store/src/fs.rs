use crate::{io_error, MemStore, Store, StoreError, StoreResult, StoredValue};
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

/// File-backed store: an in-memory table whose persistent subset is flushed
/// to a single JSON file after every mutation.
///
/// Flushing is fire-and-forget, matching the robot store's durability model:
/// the `Store` methods stay infallible and a failed write is logged rather
/// than surfaced. Transient entries never reach the file.
#[derive(Clone)]
pub struct FsStore {
    cells: MemStore,
    path: PathBuf,
}

impl fmt::Debug for FsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsStore")
            .field("path", &self.path)
            .field("cells", &self.cells)
            .finish()
    }
}

impl FsStore {
    /// Open the store file at `path`, loading any existing snapshot. A
    /// missing file is an empty store; the file is created on first flush.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let cells = MemStore::new();
        match fs::read(&path) {
            Ok(bytes) => {
                let snapshot: BTreeMap<String, StoredValue> =
                    serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                for (key, value) in snapshot {
                    cells.set(&key, value);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(io_error(&path, err)),
        }
        Ok(Self { cells, path })
    }

    fn flush(&self) {
        if let Err(err) = self.try_flush() {
            log::warn!("failed to flush store to {:?}: {err}", self.path);
        }
    }

    fn try_flush(&self) -> StoreResult<()> {
        let snapshot = self.cells.persistent_snapshot();
        let bytes = serde_json::to_vec_pretty(&snapshot).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        fs::write(&self.path, bytes).map_err(|e| io_error(&self.path, e))
    }
}

impl Store for FsStore {
    fn entry(&self, key: &str) -> Option<StoredValue> {
        self.cells.entry(key)
    }

    fn init(&self, key: &str, value: StoredValue) {
        if !self.cells.contains(key) {
            self.cells.init(key, value);
            self.flush();
        }
    }

    fn set(&self, key: &str, value: StoredValue) {
        self.cells.set(key, value);
        self.flush();
    }

    fn remove(&self, key: &str) {
        self.cells.remove(key);
        self.flush();
    }

    fn keys(&self) -> Vec<String> {
        self.cells.keys()
    }

    fn mark_transient(&self, key: &str) {
        self.cells.mark_transient(key);
        self.flush();
    }

    fn persistent_snapshot(&self) -> BTreeMap<String, StoredValue> {
        self.cells.persistent_snapshot()
    }
}
