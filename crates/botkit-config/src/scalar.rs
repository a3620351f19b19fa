//! Compile-time bridge between the five scalar Rust types and the store's
//! dynamically-typed [`StoredValue`] layer.

use crate::descriptor::ScalarKind;
use botkit_store::StoredValue;

/// Implemented by the scalar types a record leaf may have: `bool`, `i32`,
/// `i64`, `f64`, and `String`. Each maps to one [`ScalarKind`] and one
/// [`StoredValue`] variant.
pub trait ScalarValue: Clone + Send + Sync + 'static {
    fn kind() -> ScalarKind;

    /// The shape's zero value (`false` / `0` / `0.0` / `""`).
    fn zero() -> Self;

    fn into_value(self) -> StoredValue;

    /// Extract this type from a value. `None` on variant mismatch.
    fn from_value(value: &StoredValue) -> Option<Self>;
}

impl ScalarValue for bool {
    fn kind() -> ScalarKind {
        ScalarKind::Bool
    }

    fn zero() -> Self {
        false
    }

    fn into_value(self) -> StoredValue {
        StoredValue::Bool(self)
    }

    fn from_value(value: &StoredValue) -> Option<Self> {
        value.as_bool()
    }
}

impl ScalarValue for i32 {
    fn kind() -> ScalarKind {
        ScalarKind::Int
    }

    fn zero() -> Self {
        0
    }

    fn into_value(self) -> StoredValue {
        StoredValue::Int(self)
    }

    fn from_value(value: &StoredValue) -> Option<Self> {
        value.as_int()
    }
}

impl ScalarValue for i64 {
    fn kind() -> ScalarKind {
        ScalarKind::Long
    }

    fn zero() -> Self {
        0
    }

    fn into_value(self) -> StoredValue {
        StoredValue::Long(self)
    }

    fn from_value(value: &StoredValue) -> Option<Self> {
        value.as_long()
    }
}

impl ScalarValue for f64 {
    fn kind() -> ScalarKind {
        ScalarKind::Double
    }

    fn zero() -> Self {
        0.0
    }

    fn into_value(self) -> StoredValue {
        StoredValue::Double(self)
    }

    fn from_value(value: &StoredValue) -> Option<Self> {
        value.as_double()
    }
}

impl ScalarValue for String {
    fn kind() -> ScalarKind {
        ScalarKind::Text
    }

    fn zero() -> Self {
        String::new()
    }

    fn into_value(self) -> StoredValue {
        StoredValue::Text(self)
    }

    fn from_value(value: &StoredValue) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }
}
