//! Hierarchical key derivation.

use botkit_store::PATH_SEPARATOR;
use std::{
    collections::HashMap,
    sync::RwLock,
};

/// Derives store keys from a shape identity and a component name.
///
/// The configured strip prefix supports class-rooted namespaces: binding
/// under `"frc.robot.DriveConfig"` with strip prefix `"frc.robot."` yields
/// keys rooted at `DriveConfig`. Derived keys are cached per
/// `(shape, component)` pair since the same shapes are re-derived on every
/// bind call.
pub struct KeyFactory {
    strip_prefix: String,
    cache: RwLock<HashMap<(String, String), String>>,
}

impl KeyFactory {
    pub fn new(strip_prefix: impl Into<String>) -> Self {
        Self {
            strip_prefix: strip_prefix.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Join `shape_ident` (with the strip prefix removed, when present)
    /// and `component`. If stripping leaves nothing, the bare component
    /// name is the key. Deterministic and infallible.
    pub fn key(&self, shape_ident: &str, component: &str) -> String {
        let cache_key = (shape_ident.to_owned(), component.to_owned());
        if let Some(derived) = self.cache.read().unwrap().get(&cache_key) {
            return derived.clone();
        }
        let derived = self.derive(shape_ident, component);
        self.cache
            .write()
            .unwrap()
            .insert(cache_key, derived.clone());
        derived
    }

    fn derive(&self, shape_ident: &str, component: &str) -> String {
        let stripped = if !self.strip_prefix.is_empty() {
            shape_ident
                .strip_prefix(&self.strip_prefix)
                .unwrap_or(shape_ident)
        } else {
            shape_ident
        };
        if stripped.is_empty() {
            component.to_owned()
        } else {
            format!("{stripped}{PATH_SEPARATOR}{component}")
        }
    }
}

impl std::fmt::Debug for KeyFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFactory")
            .field("strip_prefix", &self.strip_prefix)
            .field("cached", &self.cache.read().unwrap().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_separator() {
        let keys = KeyFactory::new("");
        assert_eq!(keys.key("Drive", "enabled"), "Drive/enabled");
        assert_eq!(keys.key("Root/sub", "value"), "Root/sub/value");
    }

    #[test]
    fn strips_configured_prefix() {
        let keys = KeyFactory::new("frc.robot.");
        assert_eq!(keys.key("frc.robot.DriveConfig", "enabled"), "DriveConfig/enabled");
        // Non-matching idents are left alone.
        assert_eq!(keys.key("Vision", "pipeline"), "Vision/pipeline");
    }

    #[test]
    fn full_strip_uses_bare_component_name() {
        let keys = KeyFactory::new("DriveConfig");
        assert_eq!(keys.key("DriveConfig", "enabled"), "enabled");
    }

    #[test]
    fn derivation_is_deterministic_across_cache_hits() {
        let keys = KeyFactory::new("");
        let first = keys.key("Drive", "weight");
        let second = keys.key("Drive", "weight");
        assert_eq!(first, second);
        assert_eq!(first, "Drive/weight");
    }
}
