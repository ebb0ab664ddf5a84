use serde::de::DeserializeOwned;
use serde_json::Value;

/// A field of a partial JSON payload: missing, explicitly `null`, or set.
#[derive(Debug, PartialEq)]
pub enum NullableValue<T> {
    Omitted,
    Null,
    Value(T),
}

impl<T> NullableValue<T> {
    /// Outer `None` for an omitted key, `Some(None)` for `null`.
    pub fn into_patch(self) -> Option<Option<T>> {
        match self {
            NullableValue::Omitted => None,
            NullableValue::Null => Some(None),
            NullableValue::Value(value) => Some(Some(value)),
        }
    }
}

pub fn classify_nullable<T: DeserializeOwned>(
    optional_value: Option<&Value>,
    expected: &str,
) -> Result<NullableValue<T>, String> {
    match optional_value {
        None => Ok(NullableValue::Omitted),
        Some(Value::Null) => Ok(NullableValue::Null),
        Some(value) => T::deserialize(value)
            .map(NullableValue::Value)
            .map_err(|_| format!("expected {expected} or null, got {value}")),
    }
}
