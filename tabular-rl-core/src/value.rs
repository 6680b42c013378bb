//! Utility (state-value) tables

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{MdpError, Result, State};

/// A tabular utility function: expected discounted cumulative reward per
/// state. Solvers create one fresh per run, mutate it in place across
/// sweeps and hand it back at convergence.
///
/// Entries iterate in insertion order, so sweeps over a utility built
/// from an MDP's state set are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize + Eq + std::hash::Hash",
    deserialize = "S: Deserialize<'de> + Eq + std::hash::Hash"
))]
pub struct Utility<S: State> {
    values: IndexMap<S, f64>,
}

impl<S: State> Utility<S> {
    /// Build a utility table with every given state at 0.0
    pub fn zeroed<'a, I>(states: I) -> Self
    where
        S: 'a,
        I: IntoIterator<Item = &'a S>,
    {
        Self {
            values: states.into_iter().map(|s| (s.clone(), 0.0)).collect(),
        }
    }

    /// Utility of `state`.
    ///
    /// # Errors
    /// [`MdpError::UnknownState`] if the state has no entry.
    pub fn value(&self, state: &S) -> Result<f64> {
        self.values
            .get(state)
            .copied()
            .ok_or_else(|| MdpError::UnknownState(format!("{state:?}")))
    }

    /// Set the utility of `state`
    pub fn set(&mut self, state: S, value: f64) {
        self.values.insert(state, value);
    }

    /// Iterate over `(state, utility)` entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> {
        self.values.iter().map(|(s, v)| (s, *v))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: State> FromIterator<(S, f64)> for Utility<S> {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use indexmap::IndexSet;

    #[test]
    fn zeroed_covers_every_state() {
        let states: IndexSet<u32> = IndexSet::from([3, 1, 2]);
        let utility = Utility::zeroed(&states);
        assert_eq!(utility.len(), 3);
        for s in &states {
            assert_relative_eq!(utility.value(s).unwrap(), 0.0);
        }
    }

    #[test]
    fn missing_state_is_an_error() {
        let utility: Utility<u32> = Utility::zeroed(&IndexSet::from([0]));
        assert!(utility.value(&9).is_err());
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut utility = Utility::zeroed(&IndexSet::from([0u32]));
        utility.set(0, 4.2);
        assert_relative_eq!(utility.value(&0).unwrap(), 4.2);
        assert_eq!(utility.len(), 1);
    }

    #[test]
    fn serde_round_trip() {
        let utility: Utility<u32> = [(0, 1.5), (1, -0.5)].into_iter().collect();
        let json = serde_json::to_string(&utility).unwrap();
        let back: Utility<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, utility);
    }
}
