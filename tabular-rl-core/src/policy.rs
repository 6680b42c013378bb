//! Policy tables mapping states to chosen actions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Action, MdpError, Result, State};

/// A deterministic tabular policy: one chosen action per state, with
/// `None` standing for the no-op sentinel of terminal states.
///
/// Entries iterate in insertion order, matching the state order of the
/// MDP the policy was extracted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize + Eq + std::hash::Hash, A: Serialize",
    deserialize = "S: Deserialize<'de> + Eq + std::hash::Hash, A: Deserialize<'de>"
))]
pub struct Policy<S: State, A: Action> {
    choices: IndexMap<S, Option<A>>,
}

impl<S: State, A: Action> Policy<S, A> {
    /// Create an empty policy
    #[must_use]
    pub fn new() -> Self {
        Self {
            choices: IndexMap::new(),
        }
    }

    /// Record the chosen action for `state`
    pub fn insert(&mut self, state: S, action: Option<A>) {
        self.choices.insert(state, action);
    }

    /// The chosen action for `state` (`None` = no-op).
    ///
    /// # Errors
    /// [`MdpError::UnknownState`] if the policy has no entry for it.
    pub fn action(&self, state: &S) -> Result<Option<&A>> {
        self.choices
            .get(state)
            .map(Option::as_ref)
            .ok_or_else(|| MdpError::UnknownState(format!("{state:?}")))
    }

    /// Iterate over `(state, chosen action)` entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&S, Option<&A>)> {
        self.choices.iter().map(|(s, a)| (s, a.as_ref()))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Whether the policy is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl<S: State, A: Action> Default for Policy<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: Action> FromIterator<(S, Option<A>)> for Policy<S, A> {
    fn from_iter<I: IntoIterator<Item = (S, Option<A>)>>(iter: I) -> Self {
        Self {
            choices: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_sentinel() {
        let mut policy: Policy<u32, u8> = Policy::new();
        policy.insert(0, Some(2));
        policy.insert(1, None);

        assert_eq!(policy.action(&0).unwrap(), Some(&2));
        assert_eq!(policy.action(&1).unwrap(), None);
        assert!(matches!(policy.action(&5), Err(MdpError::UnknownState(_))));
    }

    #[test]
    fn serde_round_trip() {
        let policy: Policy<u32, u8> = [(0, Some(1)), (1, None)].into_iter().collect();
        let json = serde_json::to_string(&policy).unwrap();
        let back: Policy<u32, u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }
}
