//! The binding facade.

use crate::error::ConfigError;
use crate::key::KeyFactory;
use crate::record::Persisted;
use crate::registry;
use crate::report::{self, WarningSink};
use crate::walker::Walker;
use botkit_store::{DynStore, PATH_SEPARATOR};
use std::sync::Arc;

/// Binds [`Persisted`] records against a store.
///
/// By default a structural failure during a defaults-backed bind is
/// reported as a warning and the supplied defaults are returned unchanged,
/// so a malformed record cannot take the robot down during startup.
/// [`raise_errors`](Self::raise_errors) switches to propagation, which
/// test suites use to assert on the failure precisely.
pub struct ConfigBinder {
    store: DynStore,
    keys: KeyFactory,
    sink: Arc<dyn WarningSink>,
    raise_errors: bool,
}

impl ConfigBinder {
    pub fn new(store: DynStore) -> Self {
        Self {
            store,
            keys: KeyFactory::new(""),
            sink: report::default_sink(),
            raise_errors: false,
        }
    }

    /// Strip this prefix from shape identities during key derivation.
    pub fn strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.keys = KeyFactory::new(prefix);
        self
    }

    /// Route warnings to `sink` instead of the `log` facade.
    pub fn warning_sink(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Propagate structural bind failures instead of falling back to the
    /// supplied defaults.
    pub fn raise_errors(mut self, raise: bool) -> Self {
        self.raise_errors = raise;
        self
    }

    /// Bind `R` under `namespace`, seeding absent store keys from
    /// `defaults` and reading existing keys as-is.
    pub fn bind<R: Persisted + Clone>(
        &self,
        namespace: &str,
        defaults: &R,
    ) -> Result<R, ConfigError> {
        self.prepare::<R>(namespace)?;
        let walker = self.walker::<R>(namespace);
        match R::bind_from(&walker, Some(defaults)) {
            Ok(bound) => Ok(bound),
            Err(err @ ConfigError::Schema { .. }) if !self.raise_errors => {
                self.sink.warn(&format!(
                    "binding namespace '{namespace}' failed ({err}); keeping the supplied defaults"
                ));
                Ok(defaults.clone())
            }
            Err(err) => Err(err),
        }
    }

    /// Bind `R` under `namespace` with no default instance: absent keys
    /// are seeded with each leaf shape's zero value. Structural failures
    /// always propagate here because there is no fallback instance.
    pub fn bind_default<R: Persisted>(&self, namespace: &str) -> Result<R, ConfigError> {
        self.prepare::<R>(namespace)?;
        let walker = self.walker::<R>(namespace);
        R::bind_from(&walker, None)
    }

    fn prepare<R: Persisted>(&self, namespace: &str) -> Result<(), ConfigError> {
        if namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        if namespace.contains(PATH_SEPARATOR) {
            return Err(ConfigError::NamespaceSeparator(namespace.to_owned()));
        }
        registry::verify_or_register(&self.store, namespace, &R::identity())
    }

    fn walker<R: Persisted>(&self, namespace: &str) -> Walker<'_> {
        Walker::new(
            &self.store,
            &self.keys,
            &self.sink,
            namespace.to_owned(),
            R::shape(),
        )
    }
}

impl std::fmt::Debug for ConfigBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigBinder")
            .field("keys", &self.keys)
            .field("raise_errors", &self.raise_errors)
            .finish()
    }
}
