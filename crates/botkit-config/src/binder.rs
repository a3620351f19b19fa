//! Per-shape leaf binding strategies.

use crate::descriptor::{FieldKind, ScalarKind};
use botkit_store::{Store, StoredValue};

/// Initialize-or-read strategy for one scalar shape.
///
/// The registry is the closed set of supported leaf tags: every scalar and
/// live-scalar kind has a binder; nested and unsupported kinds have none,
/// which the walker treats as "copy the default verbatim", not as an error.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LeafBinder {
    kind: ScalarKind,
}

impl LeafBinder {
    pub(crate) fn for_kind(kind: FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Scalar(kind) | FieldKind::Live(kind) => Some(Self { kind }),
            FieldKind::Nested(_) | FieldKind::Other(_) => None,
        }
    }

    /// Bind one leaf. With `should_init` (the store lacks `key`) the
    /// default — or the shape's zero value — is written through the typed
    /// `init_*` and returned. Otherwise the store's current value is read
    /// with the default as fallback; the store is not modified, so a
    /// pre-existing entry is never clobbered.
    pub(crate) fn bind(
        &self,
        store: &dyn Store,
        key: &str,
        default: Option<StoredValue>,
        should_init: bool,
    ) -> StoredValue {
        match self.kind {
            ScalarKind::Bool => {
                let fallback = default.and_then(|v| v.as_bool()).unwrap_or(false);
                if should_init {
                    store.init_bool(key, fallback);
                    StoredValue::Bool(fallback)
                } else {
                    StoredValue::Bool(store.get_bool(key, fallback))
                }
            }
            ScalarKind::Int => {
                let fallback = default.and_then(|v| v.as_int()).unwrap_or(0);
                if should_init {
                    store.init_int(key, fallback);
                    StoredValue::Int(fallback)
                } else {
                    StoredValue::Int(store.get_int(key, fallback))
                }
            }
            ScalarKind::Long => {
                let fallback = default.and_then(|v| v.as_long()).unwrap_or(0);
                if should_init {
                    store.init_long(key, fallback);
                    StoredValue::Long(fallback)
                } else {
                    StoredValue::Long(store.get_long(key, fallback))
                }
            }
            ScalarKind::Double => {
                let fallback = default.and_then(|v| v.as_double()).unwrap_or(0.0);
                if should_init {
                    store.init_double(key, fallback);
                    StoredValue::Double(fallback)
                } else {
                    StoredValue::Double(store.get_double(key, fallback))
                }
            }
            ScalarKind::Text => {
                let fallback = default
                    .and_then(|v| v.as_text().map(str::to_owned))
                    .unwrap_or_default();
                if should_init {
                    store.init_text(key, &fallback);
                    StoredValue::Text(fallback)
                } else {
                    StoredValue::Text(store.get_text(key, &fallback))
                }
            }
        }
    }
}
