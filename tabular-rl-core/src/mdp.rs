//! The abstract MDP contract — Sutton & Barto 2018, ch. 3

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{Action, Result, State};

/// One weighted outcome of taking an action: the probability of landing
/// in `state`. Probabilities for a fixed (state, action) pair sum to 1
/// within floating tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S> {
    /// Probability of this outcome
    pub probability: f64,
    /// Resulting state
    pub state: S,
}

/// Transition model capability.
///
/// Every concrete MDP variant must supply a deterministic, pure
/// implementation; the trait declares the contract without a body. The
/// `action` is `None` exactly when the state is terminal — the returned
/// list is then a single zero-weight self-loop so downstream summations
/// stay well-defined.
pub trait TransitionModel {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// All `(probability, next state)` outcomes of `action` in `state`
    fn transitions(
        &self,
        state: &Self::State,
        action: Option<&Self::Action>,
    ) -> Vec<Transition<Self::State>>;
}

/// A finite Markov decision process: states, actions, terminal states,
/// a discount factor, a per-state reward and a transition model.
///
/// The model is immutable once constructed, except where a concrete
/// implementation chooses to expose reward mutation (the grid world
/// does, through its normalization operations).
pub trait Mdp: TransitionModel {
    /// The full state set, in a stable iteration order
    fn states(&self) -> &IndexSet<Self::State>;

    /// The action universe available in non-terminal states
    fn action_list(&self) -> &[Self::Action];

    /// Whether `state` is terminal (no further transitions)
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Discount factor, in (0, 1]
    fn gamma(&self) -> f64;

    /// Reward for `state`.
    ///
    /// # Errors
    /// [`crate::MdpError::UndefinedReward`] if the state carries no
    /// reward (an obstacle or a coordinate outside the model).
    fn reward(&self, state: &Self::State) -> Result<f64>;

    /// Actions choosable in `state`: the no-op sentinel singleton for
    /// terminals, the full action list otherwise.
    fn actions(&self, state: &Self::State) -> Vec<Option<Self::Action>> {
        if self.is_terminal(state) {
            vec![None]
        } else {
            self.action_list().iter().cloned().map(Some).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MdpError;

    // Minimal two-state chain: 0 -> 1 (terminal), one action.
    struct Chain {
        states: IndexSet<u32>,
        actions: [u8; 1],
    }

    impl Chain {
        fn new() -> Self {
            Self {
                states: IndexSet::from([0, 1]),
                actions: [0],
            }
        }
    }

    impl TransitionModel for Chain {
        type State = u32;
        type Action = u8;

        fn transitions(&self, state: &u32, action: Option<&u8>) -> Vec<Transition<u32>> {
            match action {
                None => vec![Transition {
                    probability: 0.0,
                    state: *state,
                }],
                Some(_) => vec![Transition {
                    probability: 1.0,
                    state: 1,
                }],
            }
        }
    }

    impl Mdp for Chain {
        fn states(&self) -> &IndexSet<u32> {
            &self.states
        }

        fn action_list(&self) -> &[u8] {
            &self.actions
        }

        fn is_terminal(&self, state: &u32) -> bool {
            *state == 1
        }

        fn gamma(&self) -> f64 {
            0.9
        }

        fn reward(&self, state: &u32) -> Result<f64> {
            if self.states.contains(state) {
                Ok(f64::from(*state))
            } else {
                Err(MdpError::UndefinedReward(format!("{state:?}")))
            }
        }
    }

    #[test]
    fn terminal_states_offer_the_noop_sentinel() {
        let chain = Chain::new();
        assert_eq!(chain.actions(&1), vec![None]);
        assert_eq!(chain.actions(&0), vec![Some(0)]);
    }

    #[test]
    fn noop_transition_is_a_zero_weight_self_loop() {
        let chain = Chain::new();
        let outcomes = chain.transitions(&1, None);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].probability, 0.0);
        assert_eq!(outcomes[0].state, 1);
    }

    #[test]
    fn reward_lookup_outside_the_model_fails_loudly() {
        let chain = Chain::new();
        assert!(matches!(
            chain.reward(&7),
            Err(MdpError::UndefinedReward(_))
        ));
    }
}
