//! Namespace registry: one namespace, one schema identity.
//!
//! Each bound namespace leaves a transient marker entry under
//! [`REGISTRY_ROOT`] recording the identity of the schema it was first
//! bound to. The marker is excluded from durable snapshots: the registry
//! guards the current store's lifetime only, it is not user data.

use crate::error::ConfigError;
use botkit_store::{DynStore, PATH_SEPARATOR};
use std::sync::atomic::{AtomicBool, Ordering};

/// Root of the marker tree. Dotted so real namespaces are unlikely to
/// collide with it.
pub const REGISTRY_ROOT: &str = ".schemas";

/// Marker root used before markers became transient. Swept once per
/// process so stale persistent markers do not outlive the migration.
const LEGACY_ROOT: &str = "RegisteredSchemas";

static LEGACY_SWEPT: AtomicBool = AtomicBool::new(false);

/// Register `identity` for `namespace`, or verify the existing binding.
/// A namespace already bound to a different identity is a fatal error and
/// leaves the marker at the first-registered identity.
pub(crate) fn verify_or_register(
    store: &DynStore,
    namespace: &str,
    identity: &str,
) -> Result<(), ConfigError> {
    sweep_legacy(store);
    let marker = format!("{REGISTRY_ROOT}{PATH_SEPARATOR}{namespace}");
    store.init_text(&marker, identity);
    store.mark_transient(&marker);
    let existing = store.get_text(&marker, identity);
    if existing == identity {
        Ok(())
    } else {
        Err(ConfigError::NamespaceBound {
            namespace: namespace.to_owned(),
            existing,
            requested: identity.to_owned(),
        })
    }
}

fn sweep_legacy(store: &DynStore) {
    if LEGACY_SWEPT
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        let legacy_prefix = format!("{LEGACY_ROOT}{PATH_SEPARATOR}");
        for key in store.keys() {
            if key.starts_with(&legacy_prefix) {
                store.remove(&key);
            }
        }
    }
}

/// Re-arm the once-per-process legacy sweep. Test isolation only.
#[doc(hidden)]
pub fn reset_legacy_sweep_for_tests() {
    LEGACY_SWEPT.store(false, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use botkit_store::MemStore;
    use std::sync::Arc;

    #[test]
    fn first_registration_writes_transient_marker() {
        let store: DynStore = Arc::new(MemStore::new());
        verify_or_register(&store, "Drive", "DriveConfig@sha256:aa").expect("register");
        assert_eq!(store.get_text(".schemas/Drive", ""), "DriveConfig@sha256:aa");
        assert!(!store.persistent_snapshot().contains_key(".schemas/Drive"));
    }

    #[test]
    fn matching_rebind_is_silent() {
        let store: DynStore = Arc::new(MemStore::new());
        verify_or_register(&store, "Drive", "DriveConfig@sha256:aa").expect("first");
        verify_or_register(&store, "Drive", "DriveConfig@sha256:aa").expect("second");
    }

    #[test]
    fn conflicting_rebind_is_rejected_and_marker_kept() {
        let store: DynStore = Arc::new(MemStore::new());
        verify_or_register(&store, "Drive", "DriveConfig@sha256:aa").expect("first");
        let err = verify_or_register(&store, "Drive", "ArmConfig@sha256:bb").expect_err("conflict");
        match err {
            ConfigError::NamespaceBound {
                namespace,
                existing,
                requested,
            } => {
                assert_eq!(namespace, "Drive");
                assert_eq!(existing, "DriveConfig@sha256:aa");
                assert_eq!(requested, "ArmConfig@sha256:bb");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.get_text(".schemas/Drive", ""), "DriveConfig@sha256:aa");
    }

    #[test]
    fn distinct_namespaces_are_independent() {
        let store: DynStore = Arc::new(MemStore::new());
        verify_or_register(&store, "Drive", "DriveConfig@sha256:aa").expect("drive");
        verify_or_register(&store, "Arm", "ArmConfig@sha256:bb").expect("arm");
    }
}
