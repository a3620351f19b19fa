//! The record trait every bindable configuration type implements.

use crate::descriptor::RecordShape;
use crate::error::ConfigError;
use crate::walker::Walker;

/// A persisted configuration record: an immutable product type whose
/// leaves are synchronized against the external store.
///
/// Implementations are normally generated by `#[derive(Persisted)]`. A
/// manual impl must keep [`shape`](Self::shape) and
/// [`bind_from`](Self::bind_from) consistent: `bind_from` must visit every
/// descriptor entry exactly once, in declaration order, through the
/// matching walker operation. The walker rejects index or kind mismatches
/// with a schema error.
pub trait Persisted: Sized {
    /// The record's field descriptor table.
    fn shape() -> &'static RecordShape;

    /// Construct a fresh instance with every leaf bound through `walker`,
    /// taking defaults from `defaults` where the store has no entry yet.
    fn bind_from(walker: &Walker<'_>, defaults: Option<&Self>) -> Result<Self, ConfigError>;

    /// Structural identity used by the namespace registry.
    fn identity() -> String {
        Self::shape().identity()
    }
}
