//! Value iteration — optimal utilities via repeated Bellman backups

use tracing::{debug, trace};

use tabular_rl_core::{Mdp, MdpError, Result, Utility};

use crate::greedy::expected_utility;

/// Convergence tolerance used when callers have no reason to pick one
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Solve an MDP by value iteration.
///
/// Starts from an all-zero utility table and applies full synchronous
/// Bellman backups, `U'[s] = R(s) + gamma·max_a Σ p·U[s']`, until the
/// largest per-sweep change drops below `epsilon·(1 − gamma)/gamma` —
/// the contraction bound that keeps the result within a bounded error
/// of the true fixed point. Returns the freshly updated table.
///
/// # Errors
/// [`MdpError::InvalidDiscount`] for gamma ≤ 0 and
/// [`MdpError::NonContractingDiscount`] for gamma ≥ 1, where the
/// stopping bound degenerates and the sweep loop would never exit;
/// otherwise propagates reward/utility lookup failures.
pub fn value_iteration<M: Mdp>(mdp: &M, epsilon: f64) -> Result<Utility<M::State>> {
    let gamma = mdp.gamma();
    if gamma <= 0.0 {
        return Err(MdpError::InvalidDiscount(gamma));
    }
    if gamma >= 1.0 {
        return Err(MdpError::NonContractingDiscount(gamma));
    }
    let threshold = epsilon * (1.0 - gamma) / gamma;

    let mut next = Utility::zeroed(mdp.states());
    let mut sweep = 0usize;
    loop {
        let current = next.clone();
        let mut delta = 0.0f64;
        for state in mdp.states() {
            let mut best: Option<f64> = None;
            for action in mdp.actions(state) {
                let score = expected_utility(mdp, state, action.as_ref(), &current)?;
                if best.map_or(true, |top| score > top) {
                    best = Some(score);
                }
            }
            let best = best.ok_or_else(|| MdpError::NoActions(format!("{state:?}")))?;
            let backed_up = mdp.reward(state)? + gamma * best;
            delta = delta.max((backed_up - current.value(state)?).abs());
            next.set(state.clone(), backed_up);
        }
        sweep += 1;
        trace!(sweep, delta, "bellman sweep");
        if delta < threshold {
            debug!(sweeps = sweep, delta, "value iteration converged");
            return Ok(next);
        }
    }
}
