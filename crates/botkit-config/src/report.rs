//! Warning reporting.
//!
//! Everything recoverable funnels through one injectable sink so tests can
//! intercept and assert on warning text. Fatal configuration errors never
//! pass through here; they propagate as [`ConfigError`](crate::ConfigError).

use once_cell::sync::Lazy;
use std::sync::Arc;

pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default sink: forwards to the `log` facade at warn level.
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}

static DEFAULT_SINK: Lazy<Arc<dyn WarningSink>> = Lazy::new(|| Arc::new(LogSink));

pub(crate) fn default_sink() -> Arc<dyn WarningSink> {
    Arc::clone(&DEFAULT_SINK)
}
