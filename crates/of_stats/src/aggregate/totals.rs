use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Accumulated stat values for one side of one match.
///
/// Reads of unseen keys yield zero; keys only appear through [`StatTotals::add`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatTotals {
    values: BTreeMap<String, i64>,
}

impl StatTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, zero if never added.
    pub fn get(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    /// Add `amount` to `key`, creating it at zero first. Adding zero still
    /// records the key. Sums saturate at `i64::MAX`.
    pub fn add(&mut self, key: &str, amount: i64) {
        debug_assert!(amount >= 0, "totals never decrease");
        match self.values.get_mut(key) {
            Some(v) => *v = v.saturating_add(amount),
            None => {
                self.values.insert(key.to_string(), amount);
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, i64)> for StatTotals {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64)>>(iter: I) -> Self {
        let mut totals = StatTotals::new();
        for (key, amount) in iter {
            totals.add(key, amount);
        }
        totals
    }
}
