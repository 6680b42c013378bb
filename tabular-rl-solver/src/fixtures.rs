//! Test-only MDPs with hand-computable fixed points

use indexmap::IndexSet;
use tabular_rl_core::{Mdp, MdpError, Result, Transition, TransitionModel};

/// Test move set for [`Corridor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Walk {
    /// Toward the exit
    East,
    /// Away from the exit
    West,
}

/// A one-dimensional corridor of `len` cells. Every cell rewards 0
/// except the terminal exit at `len - 1`, which rewards 1; walking past
/// either end stays in place. Optimal utilities are
/// `U(s) = gamma^(len - 1 - s)`.
pub struct Corridor {
    states: IndexSet<u8>,
    actions: [Walk; 2],
    len: u8,
    gamma: f64,
}

impl Corridor {
    pub fn new(len: u8, gamma: f64) -> Self {
        assert!(len >= 2, "corridor needs a start and an exit");
        Self {
            states: (0..len).collect(),
            actions: [Walk::East, Walk::West],
            len,
            gamma,
        }
    }
}

impl TransitionModel for Corridor {
    type State = u8;
    type Action = Walk;

    fn transitions(&self, state: &u8, action: Option<&Walk>) -> Vec<Transition<u8>> {
        let next = match action {
            None => {
                return vec![Transition {
                    probability: 0.0,
                    state: *state,
                }]
            }
            Some(Walk::East) => (*state + 1).min(self.len - 1),
            Some(Walk::West) => state.saturating_sub(1),
        };
        vec![Transition {
            probability: 1.0,
            state: next,
        }]
    }
}

impl Mdp for Corridor {
    fn states(&self) -> &IndexSet<u8> {
        &self.states
    }

    fn action_list(&self) -> &[Walk] {
        &self.actions
    }

    fn is_terminal(&self, state: &u8) -> bool {
        *state == self.len - 1
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn reward(&self, state: &u8) -> Result<f64> {
        if self.states.contains(state) {
            Ok(if *state == self.len - 1 { 1.0 } else { 0.0 })
        } else {
            Err(MdpError::UndefinedReward(format!("{state:?}")))
        }
    }
}
