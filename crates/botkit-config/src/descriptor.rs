//! Schema descriptors: the ordered field tables that drive binding.
//!
//! A record's descriptor is normally generated by `#[derive(Persisted)]`;
//! manual `Persisted` impls build the same table with the [`FieldDef`]
//! constructors. The descriptor tree also yields the record's structural
//! identity: Rust type names are not process-unique the way a canonical
//! class name is, so the namespace registry keys on the type name plus a
//! digest of the full descriptor tree.

use sha2::{Digest, Sha256};
use std::fmt;

/// The five scalar shapes the store can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int,
    Long,
    Double,
    Text,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::Double => "double",
            ScalarKind::Text => "text",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape tag of one record component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    /// A scalar bound as a one-time snapshot.
    Scalar(ScalarKind),
    /// A scalar bound as a live accessor that re-reads the store on use.
    Live(ScalarKind),
    /// A nested record, bound recursively under an extended key prefix.
    Nested(&'static RecordShape),
    /// Anything else; carried verbatim with a warning, never stored. The
    /// payload is the source type name, used in the warning text.
    Other(&'static str),
}

/// One named, typed component of a record, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldDef {
    name: &'static str,
    kind: FieldKind,
}

impl FieldDef {
    pub fn scalar(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar(kind),
        }
    }

    pub fn live(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            kind: FieldKind::Live(kind),
        }
    }

    pub fn nested(name: &'static str, shape: &'static RecordShape) -> Self {
        Self {
            name,
            kind: FieldKind::Nested(shape),
        }
    }

    pub fn other(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Other(type_name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

/// The full descriptor of one record type.
#[derive(Debug, PartialEq)]
pub struct RecordShape {
    ident: &'static str,
    fields: Vec<FieldDef>,
}

impl RecordShape {
    pub fn new(ident: &'static str, fields: Vec<FieldDef>) -> Self {
        Self { ident, fields }
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Digest of the descriptor tree: ident, field names, and kind tags,
    /// recursing into nested records.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut rendered = String::new();
        self.render_into(&mut rendered);
        let mut hasher = Sha256::new();
        hasher.update(rendered.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Fingerprint(bytes)
    }

    /// Registry identity: `Ident@sha256:<hex>`.
    pub fn identity(&self) -> String {
        format!("{}@{}", self.ident, self.fingerprint())
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(self.ident);
        out.push('{');
        for field in &self.fields {
            out.push_str(field.name);
            out.push(':');
            match field.kind {
                FieldKind::Scalar(kind) => out.push_str(kind.name()),
                FieldKind::Live(kind) => {
                    out.push_str("live ");
                    out.push_str(kind.name());
                }
                FieldKind::Nested(shape) => shape.render_into(out),
                FieldKind::Other(type_name) => {
                    out.push_str("other ");
                    out.push_str(type_name);
                }
            }
            out.push(';');
        }
        out.push('}');
    }
}

/// SHA-256 fingerprint of a descriptor tree, displayed as `sha256:<hex>`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.to_string()).finish()
    }
}
