//! Live accessor leaves.

use crate::scalar::ScalarValue;
use botkit_store::DynStore;
use std::fmt;
use std::sync::Arc;

/// A scalar read lazily and repeatedly rather than captured once.
///
/// A store-bound `LiveValue` re-reads its key on every [`get`](Self::get),
/// so edits made externally (for example from a dashboard) are visible
/// without re-binding the enclosing record. Reads are never memoized and
/// carry no shared mutable state, so a `LiveValue` may be used from several
/// threads at once.
pub struct LiveValue<T: ScalarValue> {
    inner: Inner<T>,
}

enum Inner<T: ScalarValue> {
    Fixed(T),
    Computed(Arc<dyn Fn() -> T + Send + Sync>),
    Stored {
        store: DynStore,
        key: String,
        fallback: T,
    },
}

impl<T: ScalarValue> LiveValue<T> {
    /// A constant accessor, typically used in a default-providing instance.
    pub fn fixed(value: T) -> Self {
        Self {
            inner: Inner::Fixed(value),
        }
    }

    /// An accessor backed by an arbitrary computation.
    pub fn computed(read: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            inner: Inner::Computed(Arc::new(read)),
        }
    }

    /// An accessor bound to a store key. Falls back when the key is absent
    /// or holds a different shape.
    pub(crate) fn stored(store: DynStore, key: String, fallback: T) -> Self {
        Self {
            inner: Inner::Stored {
                store,
                key,
                fallback,
            },
        }
    }

    /// Current value. Store-bound accessors perform a fresh read per call.
    pub fn get(&self) -> T {
        match &self.inner {
            Inner::Fixed(value) => value.clone(),
            Inner::Computed(read) => read(),
            Inner::Stored {
                store,
                key,
                fallback,
            } => store
                .entry(key)
                .and_then(|v| T::from_value(&v))
                .unwrap_or_else(|| fallback.clone()),
        }
    }

    /// The store key this accessor reads, if it is store-bound.
    pub fn key(&self) -> Option<&str> {
        match &self.inner {
            Inner::Stored { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl<T: ScalarValue> Clone for LiveValue<T> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            Inner::Fixed(value) => Inner::Fixed(value.clone()),
            Inner::Computed(read) => Inner::Computed(Arc::clone(read)),
            Inner::Stored {
                store,
                key,
                fallback,
            } => Inner::Stored {
                store: Arc::clone(store),
                key: key.clone(),
                fallback: fallback.clone(),
            },
        };
        Self { inner }
    }
}

impl<T: ScalarValue + Default> Default for LiveValue<T> {
    fn default() -> Self {
        Self::fixed(T::default())
    }
}

impl<T: ScalarValue + fmt::Debug> fmt::Debug for LiveValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Fixed(value) => f.debug_tuple("LiveValue::Fixed").field(value).finish(),
            Inner::Computed(_) => f.write_str("LiveValue::Computed"),
            Inner::Stored { key, .. } => f.debug_tuple("LiveValue::Stored").field(key).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botkit_store::MemStore;

    #[test]
    fn fixed_and_computed_accessors() {
        let fixed = LiveValue::fixed(2813i64);
        assert_eq!(fixed.get(), 2813);
        assert_eq!(fixed.key(), None);

        let computed = LiveValue::computed(|| "Drive".to_owned());
        assert_eq!(computed.get(), "Drive");
    }

    #[test]
    fn stored_accessor_rereads_every_call() {
        let store: DynStore = Arc::new(MemStore::new());
        store.set_double("Drive/speed", 0.25);
        let live = LiveValue::stored(Arc::clone(&store), "Drive/speed".into(), 0.0);
        assert_eq!(live.get(), 0.25);
        store.set_double("Drive/speed", 0.75);
        assert_eq!(live.get(), 0.75);
    }

    #[test]
    fn stored_accessor_falls_back_when_key_missing_or_mistyped() {
        let store: DynStore = Arc::new(MemStore::new());
        let live = LiveValue::stored(Arc::clone(&store), "Drive/speed".into(), 0.5);
        assert_eq!(live.get(), 0.5);
        store.set_text("Drive/speed", "fast");
        assert_eq!(live.get(), 0.5);
    }
}
