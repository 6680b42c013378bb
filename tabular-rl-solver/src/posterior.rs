//! Boltzmann-rational posterior scoring of reward hypotheses
//!
//! Scores how well a candidate utility function explains an expert's
//! observed policy, assuming the expert is exponentially more likely to
//! choose higher-value actions. The resulting scalar is an
//! unnormalized posterior, suitable for ranking reward hypotheses in an
//! outer search loop.

use tabular_rl_core::{Mdp, Policy, Result, Utility};

use crate::greedy::expected_utility;

/// Clamp on the summed log-likelihood before exponentiation; exp(710)
/// overflows an f64.
pub const MAX_LOG_LIKELIHOOD: f64 = 709.0;

/// Prior density over per-state reward magnitudes, kept pluggable so
/// the scorer's control flow never changes when the prior does.
pub trait RewardPrior {
    /// Density at the given (signed) reward value
    fn density(&self, reward: f64) -> f64;
}

/// Improper flat prior: every reward is equally plausible
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPrior;

impl RewardPrior for UniformPrior {
    fn density(&self, _reward: f64) -> f64 {
        1.0
    }
}

/// Jeffreys-style prior `1/sqrt((|R|/Rmax)·(1 − |R|/Rmax))`, defined
/// for 0 < |R| < `r_max`. The default `r_max` sits just above 1 so that
/// rewards normalized into [-1, 1] stay inside the support.
#[derive(Debug, Clone, Copy)]
pub struct JeffreysPrior {
    /// Upper bound on reward magnitude
    pub r_max: f64,
}

impl Default for JeffreysPrior {
    fn default() -> Self {
        Self { r_max: 1.0001 }
    }
}

impl RewardPrior for JeffreysPrior {
    fn density(&self, reward: f64) -> f64 {
        let ratio = reward.abs() / self.r_max;
        1.0 / (ratio * (1.0 - ratio)).sqrt()
    }
}

/// One-step Bellman value of taking `action` in `state` under the
/// candidate utility: `R(s) + gamma·Σ p·U[s']`. The action need not be
/// the greedy one.
///
/// # Errors
/// Propagates reward and utility lookup failures.
pub fn q_value<M: Mdp>(
    mdp: &M,
    state: &M::State,
    action: Option<&M::Action>,
    utility: &Utility<M::State>,
) -> Result<f64> {
    Ok(mdp.reward(state)? + mdp.gamma() * expected_utility(mdp, state, action, utility)?)
}

/// Sum of [`q_value`] at the expert's chosen action over all states —
/// the total one-step value the candidate utility assigns to the
/// expert's behavior. The candidate policy is accepted for signature
/// compatibility with the scorer's callers but does not enter the sum.
///
/// # Errors
/// Fails if the expert policy lacks an entry for some state.
pub fn q_sum<M: Mdp>(
    mdp: &M,
    _candidate: &Policy<M::State, M::Action>,
    utility: &Utility<M::State>,
    expert: &Policy<M::State, M::Action>,
) -> Result<f64> {
    let mut total = 0.0;
    for state in mdp.states() {
        total += q_value(mdp, state, expert.action(state)?, utility)?;
    }
    Ok(total)
}

/// Unnormalized Boltzmann likelihood of the expert's policy:
/// `exp(min(q_sum, MAX_LOG_LIKELIHOOD))`.
///
/// # Errors
/// Propagates [`q_sum`] failures.
pub fn conditional_likelihood<M: Mdp>(
    mdp: &M,
    candidate: &Policy<M::State, M::Action>,
    utility: &Utility<M::State>,
    expert: &Policy<M::State, M::Action>,
) -> Result<f64> {
    Ok(q_sum(mdp, candidate, utility, expert)?
        .min(MAX_LOG_LIKELIHOOD)
        .exp())
}

/// Product of the prior density over every state's reward.
///
/// # Errors
/// Propagates reward lookup failures.
pub fn cumulative_prior<M: Mdp, P: RewardPrior>(mdp: &M, prior: &P) -> Result<f64> {
    let mut product = 1.0;
    for state in mdp.states() {
        product *= prior.density(mdp.reward(state)?);
    }
    Ok(product)
}

/// Unnormalized posterior probability of the reward hypothesis behind
/// `utility`, given the expert's observed policy: conditional
/// likelihood times cumulative prior.
///
/// # Errors
/// Propagates failures from the likelihood and prior factors.
pub fn posterior<M: Mdp, P: RewardPrior>(
    mdp: &M,
    candidate: &Policy<M::State, M::Action>,
    utility: &Utility<M::State>,
    expert: &Policy<M::State, M::Action>,
    prior: &P,
) -> Result<f64> {
    Ok(conditional_likelihood(mdp, candidate, utility, expert)?
        * cumulative_prior(mdp, prior)?)
}
