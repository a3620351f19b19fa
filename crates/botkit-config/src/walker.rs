//! The traversal engine behind [`Persisted::bind_from`].

use crate::binder::LeafBinder;
use crate::descriptor::{FieldDef, FieldKind, RecordShape};
use crate::error::ConfigError;
use crate::key::KeyFactory;
use crate::live::LiveValue;
use crate::record::Persisted;
use crate::report::WarningSink;
use crate::scalar::ScalarValue;
use botkit_store::DynStore;
use std::sync::Arc;

/// Binding context for one record at one key prefix.
///
/// `bind_from` implementations call [`scalar`](Self::scalar),
/// [`live`](Self::live), [`nested`](Self::nested) and
/// [`unsupported`](Self::unsupported) once per field, in declaration
/// order. Nested records get a child walker whose prefix is the parent
/// prefix extended by the component name.
pub struct Walker<'a> {
    store: &'a DynStore,
    keys: &'a KeyFactory,
    sink: &'a Arc<dyn WarningSink>,
    prefix: String,
    shape: &'static RecordShape,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        store: &'a DynStore,
        keys: &'a KeyFactory,
        sink: &'a Arc<dyn WarningSink>,
        prefix: String,
        shape: &'static RecordShape,
    ) -> Self {
        Self {
            store,
            keys,
            sink,
            prefix,
            shape,
        }
    }

    /// Bind a snapshot scalar field.
    pub fn scalar<T: ScalarValue>(
        &self,
        index: usize,
        default: Option<&T>,
    ) -> Result<T, ConfigError> {
        let field = self.field(index)?;
        let binder = match field.kind() {
            FieldKind::Scalar(kind) if kind == T::kind() => self.binder(field)?,
            other => return Err(self.kind_mismatch(field, other, FieldKind::Scalar(T::kind()))),
        };
        let key = self.keys.key(&self.prefix, field.name());
        let should_init = !self.store.contains(&key);
        let bound = binder.bind(
            self.store.as_ref(),
            &key,
            default.map(|v| v.clone().into_value()),
            should_init,
        );
        T::from_value(&bound).ok_or_else(|| {
            self.schema_error(format!(
                "store returned a {} where component '{}' expects {}",
                bound.kind_name(),
                field.name(),
                T::kind()
            ))
        })
    }

    /// Bind a live-accessor field. A supplied default accessor is
    /// evaluated once to seed the store; the returned accessor re-reads
    /// the store on every use.
    pub fn live<T: ScalarValue>(
        &self,
        index: usize,
        default: Option<&LiveValue<T>>,
    ) -> Result<LiveValue<T>, ConfigError> {
        let field = self.field(index)?;
        let binder = match field.kind() {
            FieldKind::Live(kind) if kind == T::kind() => self.binder(field)?,
            other => return Err(self.kind_mismatch(field, other, FieldKind::Live(T::kind()))),
        };
        let key = self.keys.key(&self.prefix, field.name());
        let should_init = !self.store.contains(&key);
        let seed = default.map(LiveValue::get);
        let bound = binder.bind(
            self.store.as_ref(),
            &key,
            seed.map(ScalarValue::into_value),
            should_init,
        );
        let fallback = T::from_value(&bound).unwrap_or_else(T::zero);
        Ok(LiveValue::stored(Arc::clone(self.store), key, fallback))
    }

    /// Bind a nested record under an extended prefix.
    pub fn nested<R: Persisted>(
        &self,
        index: usize,
        default: Option<&R>,
    ) -> Result<R, ConfigError> {
        let field = self.field(index)?;
        match field.kind() {
            FieldKind::Nested(shape) if shape.ident() == R::shape().ident() => {}
            other => {
                return Err(self.kind_mismatch(field, other, FieldKind::Nested(R::shape())));
            }
        }
        let prefix = self.keys.key(&self.prefix, field.name());
        let child = Walker::new(self.store, self.keys, self.sink, prefix, R::shape());
        R::bind_from(&child, default)
    }

    /// Carry an unsupported field verbatim: warn once, copy the default
    /// (or `T::default()` with no default instance), touch no store key.
    pub fn unsupported<T: Clone + Default>(&self, index: usize, default: Option<&T>) -> T {
        match self.field(index) {
            Ok(field) => {
                let type_name = match field.kind() {
                    FieldKind::Other(type_name) => type_name,
                    _ => "?",
                };
                self.sink.warn(&format!(
                    "cannot persist component '{}/{}' of unsupported type {type_name}; keeping the default value",
                    self.prefix,
                    field.name()
                ));
            }
            Err(err) => self.sink.warn(&err.to_string()),
        }
        default.cloned().unwrap_or_default()
    }

    fn field(&self, index: usize) -> Result<FieldDef, ConfigError> {
        self.shape.fields().get(index).copied().ok_or_else(|| {
            self.schema_error(format!(
                "component index {index} out of range ({} components declared)",
                self.shape.fields().len()
            ))
        })
    }

    fn binder(&self, field: FieldDef) -> Result<LeafBinder, ConfigError> {
        LeafBinder::for_kind(field.kind()).ok_or_else(|| {
            self.schema_error(format!("component '{}' has no leaf binder", field.name()))
        })
    }

    fn kind_mismatch(
        &self,
        field: FieldDef,
        declared: FieldKind,
        requested: FieldKind,
    ) -> ConfigError {
        self.schema_error(format!(
            "component '{}' declared as {declared:?} but bound as {requested:?}",
            field.name()
        ))
    }

    fn schema_error(&self, detail: String) -> ConfigError {
        ConfigError::Schema {
            ident: self.shape.ident().to_owned(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ScalarKind;
    use crate::report::default_sink;
    use botkit_store::MemStore;
    use once_cell::sync::Lazy;

    // A manual Persisted impl, exercising the walker without the derive.
    #[derive(Clone, Debug, PartialEq)]
    struct Wheel {
        diameter: f64,
        inverted: bool,
    }

    impl Persisted for Wheel {
        fn shape() -> &'static RecordShape {
            static SHAPE: Lazy<RecordShape> = Lazy::new(|| {
                RecordShape::new(
                    "Wheel",
                    vec![
                        FieldDef::scalar("diameter", ScalarKind::Double),
                        FieldDef::scalar("inverted", ScalarKind::Bool),
                    ],
                )
            });
            &SHAPE
        }

        fn bind_from(walker: &Walker<'_>, defaults: Option<&Self>) -> Result<Self, ConfigError> {
            Ok(Self {
                diameter: walker.scalar(0, defaults.map(|d| &d.diameter))?,
                inverted: walker.scalar(1, defaults.map(|d| &d.inverted))?,
            })
        }
    }

    fn walker_ctx() -> (DynStore, KeyFactory, Arc<dyn WarningSink>) {
        (Arc::new(MemStore::new()), KeyFactory::new(""), default_sink())
    }

    #[test]
    fn binds_leaves_in_declaration_order() {
        let (store, keys, sink) = walker_ctx();
        let walker = Walker::new(&store, &keys, &sink, "Module".into(), Wheel::shape());
        let defaults = Wheel {
            diameter: 4.0,
            inverted: true,
        };
        let bound = Wheel::bind_from(&walker, Some(&defaults)).expect("bind");
        assert_eq!(bound, defaults);
        assert_eq!(store.get_double("Module/diameter", 0.0), 4.0);
        assert!(store.get_bool("Module/inverted", false));
    }

    #[test]
    fn kind_mismatch_is_a_schema_error() {
        let (store, keys, sink) = walker_ctx();
        let walker = Walker::new(&store, &keys, &sink, "Module".into(), Wheel::shape());
        // Component 0 is a double; asking for a long must fail.
        let err = walker.scalar::<i64>(0, None).expect_err("mismatch");
        match err {
            ConfigError::Schema { ident, .. } => assert_eq!(ident, "Wheel"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_index_is_a_schema_error() {
        let (store, keys, sink) = walker_ctx();
        let walker = Walker::new(&store, &keys, &sink, "Module".into(), Wheel::shape());
        assert!(walker.scalar::<f64>(9, None).is_err());
    }

    #[test]
    fn missing_defaults_bind_zero_values() {
        let (store, keys, sink) = walker_ctx();
        let walker = Walker::new(&store, &keys, &sink, "Module".into(), Wheel::shape());
        let bound = Wheel::bind_from(&walker, None).expect("bind");
        assert_eq!(bound.diameter, 0.0);
        assert!(!bound.inverted);
        assert!(store.contains("Module/diameter"));
    }
}
