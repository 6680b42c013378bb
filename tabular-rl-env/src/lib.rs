//! Grid-world MDP environment for tabular solvers
//!
//! A two-dimensional grid instantiation of the core MDP contract:
//! deterministic compass moves, obstacle cells excluded from the state
//! space, and a normalized reward table owned by the grid.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

pub mod grid;

// Re-export the environment types
pub use grid::{Compass, GridMdp, GridPos};

// Re-export core types
pub use tabular_rl_core::{Mdp, MdpError, Policy, Result, Transition, TransitionModel, Utility};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Compass, GridMdp, GridPos};
    pub use tabular_rl_core::prelude::*;
}
