//! Validated state and partial updates.
//!
//! - [`State`] - a snapshot that passed schema validation
//! - [`Partial`] - a set of field changes to merge over a state
//! - [`Update`] - a literal partial or a function computing one

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::value::Value;

/// A validated state snapshot.
///
/// Only [`Schema::validate`](crate::Schema::validate) creates states, so a
/// `State` always matches the schema it came from. Fields that are absent
/// are undefined.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct State {
    fields: BTreeMap<String, Value>,
}

impl State {
    pub(crate) const fn new(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns a field's value, or `None` if it is undefined.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterates over defined fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of defined fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the underlying field map.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Shallow-merges `partial` over a copy of this state's fields.
    ///
    /// The result is an unvalidated candidate.
    #[must_use]
    pub fn merged_with(&self, partial: Partial) -> BTreeMap<String, Value> {
        let mut merged = self.fields.clone();
        for (name, change) in partial.changes {
            match change {
                Some(value) => {
                    merged.insert(name, value);
                }
                None => {
                    merged.remove(&name);
                }
            }
        }
        merged
    }
}

/// Field changes to merge over a [`State`].
///
/// Each entry either sets a value or marks the field undefined. Fields not
/// mentioned keep their current value.
///
/// Deserializing from a JSON object treats every entry as a set; JSON `null`
/// sets an explicit null.
///
/// # Examples
///
/// ```
/// use ud_params::Partial;
///
/// let partial = Partial::new().set("page", 2).unset("q");
/// assert_eq!(partial.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partial {
    changes: BTreeMap<String, Option<Value>>,
}

impl Partial {
    /// Creates an empty partial.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes.insert(name.into(), Some(value.into()));
        self
    }

    /// Marks a field undefined.
    #[must_use]
    pub fn unset(mut self, name: impl Into<String>) -> Self {
        self.changes.insert(name.into(), None);
        self
    }

    /// Returns the number of changed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns `true` if nothing changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for Partial {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self {
            changes: values.into_iter().map(|(k, v)| (k, Some(v))).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Partial {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, Value>::deserialize(deserializer).map(Self::from)
    }
}

/// The argument of a write: a literal partial or a function of the current state.
pub enum Update<'a> {
    /// Merge this partial.
    Literal(Partial),
    /// Compute the partial from the current validated state.
    Updater(Box<dyn FnOnce(&State) -> Partial + 'a>),
}

impl<'a> Update<'a> {
    /// Wraps a closure as an [`Update::Updater`].
    pub fn updater(f: impl FnOnce(&State) -> Partial + 'a) -> Self {
        Self::Updater(Box::new(f))
    }

    /// Produces the partial to merge over `current`.
    #[must_use]
    pub fn resolve(self, current: &State) -> Partial {
        match self {
            Self::Literal(partial) => partial,
            Self::Updater(f) => f(current),
        }
    }
}

impl From<Partial> for Update<'_> {
    fn from(partial: Partial) -> Self {
        Self::Literal(partial)
    }
}

impl fmt::Debug for Update<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(partial) => f.debug_tuple("Literal").field(partial).finish(),
            Self::Updater(_) => f.write_str("Updater(..)"),
        }
    }
}
