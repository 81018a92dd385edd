//! Value and collection diff primitives.
//!
//! Everything above this layer is built from three shapes: a scalar change
//! ([`ValueDiff`]), an ordered-membership change ([`StringsDiff`] /
//! [`ValuesDiff`]), and a named-collection partition ([`MapDiff`]).

use crate::error::Result;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// A change between two comparable scalar values.
///
/// Present only when the values differ; absence means "no change". An unset
/// facet serializes as JSON `null`, which keeps "unset → set" distinguishable
/// from "set → same value".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueDiff {
    pub from: Value,
    pub to: Value,
}

impl ValueDiff {
    /// True when the facet was absent on the base side.
    #[must_use]
    pub fn from_unset(&self) -> bool {
        self.from.is_null()
    }

    /// True when the facet is absent on the revision side.
    #[must_use]
    pub fn to_unset(&self) -> bool {
        self.to.is_null()
    }

    /// Numeric view of both sides, when both are numbers.
    #[must_use]
    pub fn as_f64_pair(&self) -> Option<(f64, f64)> {
        Some((self.from.as_f64()?, self.to.as_f64()?))
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Compare two values; `None` means no change.
pub(crate) fn value_diff<T>(a: &T, b: &T) -> Option<ValueDiff>
where
    T: Serialize + PartialEq,
{
    if a == b {
        return None;
    }
    Some(ValueDiff {
        from: to_value(a),
        to: to_value(b),
    })
}

/// [`value_diff`], suppressed when the element is excluded by configuration.
pub(crate) fn value_diff_conditional<T>(excluded: bool, a: &T, b: &T) -> Option<ValueDiff>
where
    T: Serialize + PartialEq,
{
    if excluded {
        None
    } else {
        value_diff(a, b)
    }
}

/// Compare the `x-` vendor extensions of two elements as whole maps.
///
/// Flattened deserialization captures every unknown key, so non-extension
/// leftovers are filtered out before comparison.
pub(crate) fn extensions_diff(
    base: &IndexMap<String, Value>,
    rev: &IndexMap<String, Value>,
) -> Option<ValueDiff> {
    let pick = |map: &IndexMap<String, Value>| -> BTreeMap<String, Value> {
        map.iter()
            .filter(|(k, _)| k.starts_with("x-"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    };
    value_diff(&pick(base), &pick(rev))
}

/// Membership change of an ordered string sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StringsDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
}

impl StringsDiff {
    /// Compare two sequences, preserving each side's order.
    pub(crate) fn diff(base: &[String], rev: &[String]) -> Option<Self> {
        let result = Self {
            added: rev.iter().filter(|s| !base.contains(s)).cloned().collect(),
            deleted: base.iter().filter(|s| !rev.contains(s)).cloned().collect(),
        };
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Membership change of an ordered sequence of arbitrary values (enums).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuesDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<Value>,
}

impl ValuesDiff {
    pub(crate) fn diff(base: &[Value], rev: &[Value]) -> Option<Self> {
        let result = Self {
            added: rev.iter().filter(|v| !base.contains(v)).cloned().collect(),
            deleted: base.iter().filter(|v| !rev.contains(v)).cloned().collect(),
        };
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Partition of two named collections into added, deleted, and modified keys.
///
/// Every key appears in exactly one partition; keys present on both sides
/// with an empty per-key diff are omitted entirely. `BTree` collections keep
/// the output ordering independent of document map iteration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDiff<D> {
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub added: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub deleted: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<String, D>,
}

impl<D> Default for MapDiff<D> {
    fn default() -> Self {
        Self {
            added: BTreeSet::new(),
            deleted: BTreeSet::new(),
            modified: BTreeMap::new(),
        }
    }
}

impl<D> MapDiff<D> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    /// Partition two named collections, diffing elements present on both
    /// sides with `diff_element`. Returns `None` when nothing changed.
    pub(crate) fn diff<T, F>(
        base: &IndexMap<String, T>,
        rev: &IndexMap<String, T>,
        mut diff_element: F,
    ) -> Result<Option<Self>>
    where
        F: FnMut(&T, &T) -> Result<Option<D>>,
    {
        let mut result = Self::default();

        for (key, base_item) in base {
            match rev.get(key) {
                None => {
                    result.deleted.insert(key.clone());
                }
                Some(rev_item) => {
                    if let Some(diff) = diff_element(base_item, rev_item)? {
                        result.modified.insert(key.clone(), diff);
                    }
                }
            }
        }
        for key in rev.keys() {
            if !base.contains_key(key) {
                result.added.insert(key.clone());
            }
        }

        Ok(if result.is_empty() {
            None
        } else {
            Some(result)
        })
    }
}
