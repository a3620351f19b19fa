//! Hierarchical key/value store contract shared by the botkit libraries,
//! plus in-memory and file-backed implementations.
//!
//! Keys are flat strings joined from path segments with [`PATH_SEPARATOR`].
//! Entries carry a persistence flag: transient entries behave like any other
//! at runtime but are excluded from durable snapshots (and therefore from
//! the on-disk file kept by [`FsStore`]).

mod fs;
mod mem;

pub use fs::FsStore;
pub use mem::MemStore;

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, io, path::PathBuf, sync::Arc};

/// Separator used to join hierarchical key segments. Caller-chosen
/// namespaces must not contain it.
pub const PATH_SEPARATOR: char = '/';

pub type StoreResult<T> = Result<T, StoreError>;
pub type DynStore = Arc<dyn Store>;

/// One stored scalar. The store is dynamically typed: a typed read against
/// an entry of a different variant yields the caller's fallback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum StoredValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Text(String),
}

impl StoredValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            StoredValue::Bool(_) => "bool",
            StoredValue::Int(_) => "int",
            StoredValue::Long(_) => "long",
            StoredValue::Double(_) => "double",
            StoredValue::Text(_) => "text",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            StoredValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            StoredValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            StoredValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Store contract. All operations are non-blocking local reads/writes;
/// durability (where offered) is fire-and-forget.
///
/// The typed `init_*` methods create a key with a default only if it is
/// absent, and are no-ops otherwise. The typed `get_*` methods return the
/// fallback when the key is absent or holds a different variant.
pub trait Store: Send + Sync {
    /// Current value at `key`, if any.
    fn entry(&self, key: &str) -> Option<StoredValue>;

    /// Create `key` with `value` only if absent; no-op otherwise.
    fn init(&self, key: &str, value: StoredValue);

    /// Write `value` at `key`, creating it if absent.
    fn set(&self, key: &str, value: StoredValue);

    /// Remove `key` if present.
    fn remove(&self, key: &str);

    /// All keys currently present, in unspecified order.
    fn keys(&self) -> Vec<String>;

    /// Exclude an existing entry from durable snapshots. No-op if absent.
    fn mark_transient(&self, key: &str);

    /// The durable subset: every persistent entry, sorted by key.
    fn persistent_snapshot(&self) -> BTreeMap<String, StoredValue>;

    fn contains(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    fn init_bool(&self, key: &str, default: bool) {
        self.init(key, StoredValue::Bool(default));
    }

    fn init_int(&self, key: &str, default: i32) {
        self.init(key, StoredValue::Int(default));
    }

    fn init_long(&self, key: &str, default: i64) {
        self.init(key, StoredValue::Long(default));
    }

    fn init_double(&self, key: &str, default: f64) {
        self.init(key, StoredValue::Double(default));
    }

    fn init_text(&self, key: &str, default: &str) {
        self.init(key, StoredValue::Text(default.to_owned()));
    }

    fn get_bool(&self, key: &str, fallback: bool) -> bool {
        self.entry(key).and_then(|v| v.as_bool()).unwrap_or(fallback)
    }

    fn get_int(&self, key: &str, fallback: i32) -> i32 {
        self.entry(key).and_then(|v| v.as_int()).unwrap_or(fallback)
    }

    fn get_long(&self, key: &str, fallback: i64) -> i64 {
        self.entry(key).and_then(|v| v.as_long()).unwrap_or(fallback)
    }

    fn get_double(&self, key: &str, fallback: f64) -> f64 {
        self.entry(key).and_then(|v| v.as_double()).unwrap_or(fallback)
    }

    fn get_text(&self, key: &str, fallback: &str) -> String {
        self.entry(key)
            .and_then(|v| v.as_text().map(str::to_owned))
            .unwrap_or_else(|| fallback.to_owned())
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set(key, StoredValue::Bool(value));
    }

    fn set_int(&self, key: &str, value: i32) {
        self.set(key, StoredValue::Int(value));
    }

    fn set_long(&self, key: &str, value: i64) {
        self.set(key, StoredValue::Long(value));
    }

    fn set_double(&self, key: &str, value: f64) {
        self.set(key, StoredValue::Double(value));
    }

    fn set_text(&self, key: &str, value: &str) {
        self.set(key, StoredValue::Text(value.to_owned()));
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed store file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn io_error(path: impl Into<PathBuf>, err: io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source: err,
    }
}

/// One table slot: the value plus its persistence flag.
#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) value: StoredValue,
    pub(crate) persistent: bool,
}
