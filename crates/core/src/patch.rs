//! Tri-state field wrapper for PATCH request bodies.
//!
//! `Option<T>` cannot tell "field omitted" from "field sent as null", and an
//! empty-string sentinel cannot tell "leave unchanged" from "clear". A
//! [`Patch`] keeps all three apart:
//!
//! | JSON body            | Value                 | Effect             |
//! |----------------------|-----------------------|--------------------|
//! | key absent           | `Patch::Missing`      | column untouched   |
//! | `"key": null`        | `Patch::Null`         | column set to NULL |
//! | `"key": ""`          | `Patch::Value("")`    | column set to `""` |
//!
//! Fields must be annotated with `#[serde(default)]` so that an absent key
//! deserializes to [`Patch::Missing`].

use serde::{Deserialize, Deserializer};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<T> Patch<T> {
    /// `true` unless the field was omitted.
    pub fn is_set(&self) -> bool {
        !matches!(self, Patch::Missing)
    }

    /// The new value, or `None` for both `Missing` and `Null`.
    ///
    /// Pair with [`Patch::is_set`] when binding to SQL.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Missing | Patch::Null => None,
        }
    }

    /// Convert the carried value, keeping `Missing` and `Null` as they are.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Missing => Patch::Missing,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)?),
        })
    }

    /// Reject an explicit `null` for a NOT NULL column.
    pub fn reject_null(&self, field: &str) -> Result<(), CoreError> {
        match self {
            Patch::Null => Err(CoreError::Validation(format!("{field} cannot be null"))),
            _ => Ok(()),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}
