//! Policy iteration — alternating approximate evaluation and greedy
//! improvement

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use tabular_rl_core::{Mdp, MdpError, Policy, Result, Utility};

use crate::greedy::{expected_utility, greedy_action};

/// Evaluation sweeps per improvement round (modified policy iteration)
pub const DEFAULT_EVALUATION_SWEEPS: usize = 20;

/// Approximately evaluate a fixed policy: exactly `sweeps` synchronous
/// sweeps of `U[s] ← R(s) + gamma·Σ p·U[s']` under the policy's chosen
/// actions, starting from the utility table passed in.
///
/// # Errors
/// Propagates reward, policy and utility lookup failures.
pub fn policy_evaluation<M: Mdp>(
    policy: &Policy<M::State, M::Action>,
    mut utility: Utility<M::State>,
    mdp: &M,
    sweeps: usize,
) -> Result<Utility<M::State>> {
    let gamma = mdp.gamma();
    for _ in 0..sweeps {
        let current = utility.clone();
        for state in mdp.states() {
            let action = policy.action(state)?;
            let backed_up =
                mdp.reward(state)? + gamma * expected_utility(mdp, state, action, &current)?;
            utility.set(state.clone(), backed_up);
        }
    }
    Ok(utility)
}

/// Solve an MDP by policy iteration.
///
/// Starts from a uniformly random policy and an all-zero utility, then
/// loops: evaluate the current policy ([`policy_evaluation`],
/// [`DEFAULT_EVALUATION_SWEEPS`] sweeps), replace each state's action
/// with the greedy one under the refreshed utility, and stop on the
/// first improvement sweep that changes nothing. Terminates for finite
/// models: the policy space is finite and improvement never decreases
/// utility.
///
/// # Errors
/// [`MdpError::NoActions`] if a state offers nothing to choose from;
/// otherwise propagates lookup failures.
pub fn policy_iteration<M: Mdp, R: Rng + ?Sized>(
    mdp: &M,
    rng: &mut R,
) -> Result<Policy<M::State, M::Action>> {
    let mut utility = Utility::zeroed(mdp.states());
    let mut policy = Policy::new();
    for state in mdp.states() {
        let actions = mdp.actions(state);
        let choice = actions
            .choose(rng)
            .cloned()
            .ok_or_else(|| MdpError::NoActions(format!("{state:?}")))?;
        policy.insert(state.clone(), choice);
    }

    let mut round = 0usize;
    loop {
        utility = policy_evaluation(&policy, utility, mdp, DEFAULT_EVALUATION_SWEEPS)?;
        let mut unchanged = true;
        for state in mdp.states() {
            let improved = greedy_action(mdp, state, &utility)?;
            if policy.action(state)? != improved.as_ref() {
                policy.insert(state.clone(), improved);
                unchanged = false;
            }
        }
        round += 1;
        trace!(round, unchanged, "policy improvement sweep");
        if unchanged {
            debug!(rounds = round, "policy iteration converged");
            return Ok(policy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Corridor, Walk};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn evaluation_reaches_the_policy_fixed_point() {
        let corridor = Corridor::new(2, 0.9);
        let policy: Policy<u8, Walk> =
            [(0u8, Some(Walk::East)), (1u8, None)].into_iter().collect();

        let utility = policy_evaluation(
            &policy,
            Utility::zeroed(corridor.states()),
            &corridor,
            DEFAULT_EVALUATION_SWEEPS,
        )
        .unwrap();

        assert_relative_eq!(utility.value(&1).unwrap(), 1.0);
        assert_relative_eq!(utility.value(&0).unwrap(), 0.9);
    }

    #[test]
    fn evaluation_depends_on_the_policy_it_is_given() {
        let corridor = Corridor::new(3, 0.9);
        let toward: Policy<u8, Walk> = [(0, Some(Walk::East)), (1, Some(Walk::East)), (2, None)]
            .into_iter()
            .collect();
        let away: Policy<u8, Walk> = [(0, Some(Walk::West)), (1, Some(Walk::West)), (2, None)]
            .into_iter()
            .collect();

        let zeroed = || Utility::zeroed(corridor.states());
        let u_toward =
            policy_evaluation(&toward, zeroed(), &corridor, DEFAULT_EVALUATION_SWEEPS).unwrap();
        let u_away =
            policy_evaluation(&away, zeroed(), &corridor, DEFAULT_EVALUATION_SWEEPS).unwrap();

        // Walking toward the exit is strictly better everywhere but the
        // terminal itself.
        assert!(u_toward.value(&1).unwrap() > u_away.value(&1).unwrap());
        assert_relative_eq!(u_toward.value(&2).unwrap(), u_away.value(&2).unwrap());
    }

    #[test]
    fn iteration_converges_to_walking_east() {
        let corridor = Corridor::new(4, 0.9);
        let rng = &mut StdRng::seed_from_u64(42);
        let policy = policy_iteration(&corridor, rng).unwrap();
        for s in 0u8..3 {
            assert_eq!(policy.action(&s).unwrap(), Some(&Walk::East));
        }
        assert_eq!(policy.action(&3).unwrap(), None);
    }

    #[test]
    fn iteration_is_deterministic_under_a_fixed_seed() {
        let corridor = Corridor::new(4, 0.9);
        let first = policy_iteration(&corridor, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = policy_iteration(&corridor, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }
}
