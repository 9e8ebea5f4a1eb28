//! Tri-state option fields.
//!
//! A grouped options object distinguishes three cases per key: the key is not
//! there at all, the key is there but explicitly set to nothing (`null` in
//! JSON), or the key carries a value. Only the first case leaves a lower
//! layer untouched during resolution.

use serde::{Deserialize, Deserializer};

/// A grouped option field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// The key is not present.
    Absent,
    /// The key is present without a value.
    Undefined,
    /// The key is present with a value.
    Value(T),
}

impl<T> Field<T> {
    /// Returns `true` if the key is not present.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

// Missing keys never reach this impl; containers use `#[serde(default)]` so
// they stay `Absent`. A present `null` becomes `Undefined`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Value(v),
            None => Self::Undefined,
        })
    }
}

/// Layer one field over a base value.
///
/// Start from `base`, let a present grouped field overwrite it (an undefined
/// one erases it), then let a set legacy value overwrite whatever is left.
pub fn layer<T: Clone>(base: Option<T>, grouped: &Field<T>, legacy: Option<&T>) -> Option<T> {
    if let Some(v) = legacy {
        return Some(v.clone());
    }
    match grouped {
        Field::Absent => base,
        Field::Undefined => None,
        Field::Value(v) => Some(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Probe {
        flag: Field<bool>,
    }

    #[test]
    fn test_deserialize_three_states() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.flag, Field::Absent);

        let undefined: Probe = serde_json::from_str(r#"{"flag": null}"#).unwrap();
        assert_eq!(undefined.flag, Field::Undefined);

        let value: Probe = serde_json::from_str(r#"{"flag": true}"#).unwrap();
        assert_eq!(value.flag, Field::Value(true));
    }

    #[test]
    fn test_layer_absent_keeps_base() {
        assert_eq!(layer(Some(10), &Field::Absent, None), Some(10));
    }

    #[test]
    fn test_layer_undefined_erases_base() {
        assert_eq!(layer(Some(10), &Field::Undefined, None), None);
    }

    #[test]
    fn test_layer_legacy_rescues_undefined() {
        assert_eq!(layer(Some(10), &Field::Undefined, Some(&25)), Some(25));
    }

    #[test]
    fn test_layer_legacy_beats_grouped() {
        assert_eq!(layer(Some(false), &Field::Value(false), Some(&true)), Some(true));
    }
}
