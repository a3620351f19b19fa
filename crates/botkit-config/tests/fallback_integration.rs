//! Structural-failure policy: warn-and-fallback by default, propagate on
//! request. Exercised through a deliberately malformed manual impl.

use botkit_config::{
    ConfigBinder, ConfigError, FieldDef, Persisted, RecordShape, ScalarKind, Walker, WarningSink,
};
use botkit_store::{DynStore, MemStore};
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink(Mutex<Vec<String>>);

impl CollectingSink {
    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_owned());
    }
}

/// Declares `speed` as a double but binds it as a long.
#[derive(Clone, Debug, PartialEq)]
struct BrokenConfig {
    speed: f64,
}

impl Persisted for BrokenConfig {
    fn shape() -> &'static RecordShape {
        static SHAPE: Lazy<RecordShape> = Lazy::new(|| {
            RecordShape::new(
                "BrokenConfig",
                vec![FieldDef::scalar("speed", ScalarKind::Double)],
            )
        });
        &SHAPE
    }

    fn bind_from(walker: &Walker<'_>, _defaults: Option<&Self>) -> Result<Self, ConfigError> {
        let mismatched: i64 = walker.scalar(0, None)?;
        Ok(Self {
            speed: mismatched as f64,
        })
    }
}

fn binder() -> ConfigBinder {
    let store: DynStore = Arc::new(MemStore::new());
    ConfigBinder::new(store)
}

#[test]
fn structural_failure_falls_back_to_supplied_defaults() {
    let sink = Arc::new(CollectingSink::default());
    let binder = binder().warning_sink(Arc::clone(&sink) as Arc<dyn WarningSink>);
    let defaults = BrokenConfig { speed: 0.5 };
    let bound = binder.bind("Broken", &defaults).expect("fallback");
    assert_eq!(bound, defaults);
    let warnings = sink.messages();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Broken"), "{warnings:?}");
}

#[test]
fn raise_errors_propagates_structural_failures() {
    let binder = binder().raise_errors(true);
    let err = binder
        .bind("Broken", &BrokenConfig { speed: 0.5 })
        .expect_err("should propagate");
    match err {
        ConfigError::Schema { ident, detail } => {
            assert_eq!(ident, "BrokenConfig");
            assert!(detail.contains("speed"), "{detail}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn bind_default_always_propagates_structural_failures() {
    let err = binder()
        .bind_default::<BrokenConfig>("Broken")
        .expect_err("no fallback instance");
    assert!(matches!(err, ConfigError::Schema { .. }));
}
