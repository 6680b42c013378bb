//! Greedy policy extraction from a utility function

use tabular_rl_core::{Mdp, MdpError, Policy, Result, Utility};

/// Expected utility of taking `action` in `state`: `Σ p·U[s']` over the
/// action's transition outcomes. The terminal no-op (`None`) scores 0
/// through its zero-weight self-loop.
///
/// # Errors
/// Propagates utility lookups of states outside the table.
pub fn expected_utility<M: Mdp>(
    mdp: &M,
    state: &M::State,
    action: Option<&M::Action>,
    utility: &Utility<M::State>,
) -> Result<f64> {
    let mut total = 0.0;
    for outcome in mdp.transitions(state, action) {
        total += outcome.probability * utility.value(&outcome.state)?;
    }
    Ok(total)
}

/// The action maximizing expected utility in `state`. Ties keep the
/// earliest action in the MDP's action order, so extraction is
/// deterministic.
///
/// # Errors
/// [`MdpError::NoActions`] if the state offers nothing to choose from.
pub fn greedy_action<M: Mdp>(
    mdp: &M,
    state: &M::State,
    utility: &Utility<M::State>,
) -> Result<Option<M::Action>> {
    let mut best: Option<(f64, Option<M::Action>)> = None;
    for action in mdp.actions(state) {
        let score = expected_utility(mdp, state, action.as_ref(), utility)?;
        if best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, action));
        }
    }
    best.map(|(_, action)| action)
        .ok_or_else(|| MdpError::NoActions(format!("{state:?}")))
}

/// Extract the greedy policy of a utility function over every state.
///
/// # Errors
/// Propagates lookup failures from [`greedy_action`].
pub fn best_policy<M: Mdp>(
    mdp: &M,
    utility: &Utility<M::State>,
) -> Result<Policy<M::State, M::Action>> {
    let mut policy = Policy::new();
    for state in mdp.states() {
        policy.insert(state.clone(), greedy_action(mdp, state, utility)?);
    }
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Corridor, Walk};
    use approx::assert_relative_eq;

    #[test]
    fn expected_utility_weights_outcomes() {
        let corridor = Corridor::new(2, 0.9);
        let utility = [(0u8, 0.0), (1u8, 1.0)].into_iter().collect();

        let east = expected_utility(&corridor, &0, Some(&Walk::East), &utility).unwrap();
        let west = expected_utility(&corridor, &0, Some(&Walk::West), &utility).unwrap();
        assert_relative_eq!(east, 1.0);
        assert_relative_eq!(west, 0.0); // blocked, self-transition

        // Terminal no-op scores zero through the zero-weight loop.
        let noop = expected_utility(&corridor, &1, None, &utility).unwrap();
        assert_relative_eq!(noop, 0.0);
    }

    #[test]
    fn greedy_action_picks_the_dominant_move() {
        let corridor = Corridor::new(3, 0.9);
        let utility = [(0u8, 0.0), (1, 0.5), (2, 1.0)].into_iter().collect();
        assert_eq!(
            greedy_action(&corridor, &1, &utility).unwrap(),
            Some(Walk::East)
        );
    }

    #[test]
    fn best_policy_maps_terminals_to_the_noop() {
        let corridor = Corridor::new(2, 0.9);
        let utility = [(0u8, 0.0), (1, 1.0)].into_iter().collect();
        let policy = best_policy(&corridor, &utility).unwrap();
        assert_eq!(policy.action(&0).unwrap(), Some(&Walk::East));
        assert_eq!(policy.action(&1).unwrap(), None);
    }
}
