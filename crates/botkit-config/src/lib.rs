//! Persisted-configuration binding for robot code.
//!
//! A configuration record is an immutable struct of scalars, live
//! accessors, and nested records. Binding it under a namespace derives a
//! hierarchical store key per leaf, seeds absent keys with the record's
//! defaults, reads existing keys as-is, and returns a freshly constructed
//! instance. Live-accessor leaves keep reading the store, so dashboard
//! edits show up without re-binding.
//!
//! ```no_run
//! use botkit_config::{ConfigBinder, LiveValue, Persisted};
//! use botkit_store::MemStore;
//! use std::sync::Arc;
//!
//! #[derive(Clone, Persisted)]
//! struct DriveConfig {
//!     enabled: bool,
//!     weight: i64,
//!     name: String,
//!     speed: LiveValue<f64>,
//! }
//!
//! let binder = ConfigBinder::new(Arc::new(MemStore::new()));
//! let defaults = DriveConfig {
//!     enabled: true,
//!     weight: 2813,
//!     name: "Drive".into(),
//!     speed: LiveValue::fixed(0.5),
//! };
//! let config = binder.bind("Drive", &defaults).unwrap();
//! let _ = config.speed.get(); // re-reads the store every call
//! ```

mod bind;
mod binder;
mod descriptor;
mod error;
mod key;
mod live;
mod record;
mod registry;
mod report;
mod scalar;
mod walker;

pub use bind::ConfigBinder;
pub use descriptor::{FieldDef, FieldKind, Fingerprint, RecordShape, ScalarKind};
pub use error::ConfigError;
pub use key::KeyFactory;
pub use live::LiveValue;
pub use record::Persisted;
pub use registry::{reset_legacy_sweep_for_tests, REGISTRY_ROOT};
pub use report::{LogSink, WarningSink};
pub use scalar::ScalarValue;
pub use walker::Walker;

pub use botkit_config_macros::Persisted;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
