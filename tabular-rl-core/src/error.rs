//! Error types for the MDP core library

use thiserror::Error;

/// Core error type for MDP operations
#[derive(Error, Debug)]
pub enum MdpError {
    /// Reward lookup on a state with no defined reward (e.g. an obstacle
    /// cell). Never defaulted to zero: a silent zero would corrupt every
    /// Bellman backup that touches the state.
    #[error("no reward defined for state {0}")]
    UndefinedReward(String),

    /// Lookup of a state absent from a utility or policy table
    #[error("state {0} is not part of the model")]
    UnknownState(String),

    /// Grid rows of unequal length
    #[error("ragged grid: expected {expected} columns, found a row with {actual}")]
    RaggedGrid {
        /// Column count of the first row
        expected: usize,
        /// Column count of the offending row
        actual: usize,
    },

    /// Grid with no traversable cell
    #[error("grid contains no traversable cell")]
    EmptyGrid,

    /// Discount factor outside (0, 1]
    #[error("discount factor must lie in (0, 1], got {0}")]
    InvalidDiscount(f64),

    /// Discount factor for which the contraction stopping bound degenerates
    #[error("discount factor {0} must be strictly below 1 for guaranteed convergence")]
    NonContractingDiscount(f64),

    /// A state offered no actions to choose from
    #[error("no actions available in state {0}")]
    NoActions(String),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for MDP operations
pub type Result<T> = std::result::Result<T, MdpError>;
