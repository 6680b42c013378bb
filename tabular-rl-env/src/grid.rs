//! Two-dimensional grid MDP
//!
//! States are integer coordinates laid out on a rectangular reward
//! grid; an action is a unit compass move. Obstacle cells carry no
//! reward and are excluded from the state space.

use indexmap::{IndexMap, IndexSet};
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use tabular_rl_core::{Mdp, MdpError, Policy, Result, Transition, TransitionModel};

/// Additive guard in the normalization divisor, so an all-but-zero
/// reward sum cannot divide by zero.
pub const REWARD_SUM_EPSILON: f64 = 1e-7;

/// Reward sum every grid is rescaled to at construction and after each
/// perturbation.
pub const DEFAULT_REWARD_SUM: f64 = 1.0;

/// A grid coordinate. `x` grows eastward, `y` grows northward: row 0 of
/// the internal layout is the bottom row of the visual grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Column index
    pub x: i32,
    /// Row index, counted from the bottom
    pub y: i32,
}

impl GridPos {
    /// Create a new coordinate
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one step in `direction`
    #[must_use]
    pub fn step(self, direction: Compass) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four unit compass moves available in every non-terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    /// +x
    East,
    /// +y
    North,
    /// -x
    West,
    /// -y
    South,
}

impl Compass {
    /// Every direction, in a fixed order
    pub const ALL: [Compass; 4] = [Compass::East, Compass::North, Compass::West, Compass::South];

    /// Movement delta `(dx, dy)`
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Compass::East => (1, 0),
            Compass::North => (0, 1),
            Compass::West => (-1, 0),
            Compass::South => (0, -1),
        }
    }

    /// Directional glyph for policy rendering
    #[must_use]
    pub fn arrow(self) -> char {
        match self {
            Compass::East => '>',
            Compass::North => '^',
            Compass::West => '<',
            Compass::South => 'v',
        }
    }
}

/// A two-dimensional grid MDP with deterministic single-step moves.
///
/// Built from a rectangular reward table in visual order (first row on
/// top); `None` cells are obstacles. The row order is reversed at
/// construction so that internal row 0 is the bottom row, and the
/// reward table is immediately rescaled so its signed sum is
/// [`DEFAULT_REWARD_SUM`]. The reward table is owned by the grid and
/// mutated only through [`GridMdp::normalize_rewards`] and
/// [`GridMdp::perturb_reward`], which preserve that invariant.
#[derive(Debug, Clone)]
pub struct GridMdp {
    /// Rewards indexed `[row, col]`, row 0 at the bottom; `None` marks
    /// an obstacle
    cells: Array2<Option<f64>>,
    states: IndexSet<GridPos>,
    terminals: IndexSet<GridPos>,
    init: GridPos,
    gamma: f64,
}

impl GridMdp {
    /// Build a grid MDP from a reward table in visual row order.
    ///
    /// # Errors
    /// [`MdpError::InvalidDiscount`] unless 0 < `gamma` <= 1;
    /// [`MdpError::RaggedGrid`] if rows differ in length;
    /// [`MdpError::EmptyGrid`] if no cell is traversable;
    /// [`MdpError::UnknownState`] if a terminal or the initial state is
    /// not a traversable coordinate.
    pub fn new(
        layout: Vec<Vec<Option<f64>>>,
        terminals: impl IntoIterator<Item = GridPos>,
        init: GridPos,
        gamma: f64,
    ) -> Result<Self> {
        if !(gamma > 0.0 && gamma <= 1.0) {
            return Err(MdpError::InvalidDiscount(gamma));
        }
        let rows = layout.len();
        let cols = layout.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(MdpError::EmptyGrid);
        }
        for row in &layout {
            if row.len() != cols {
                return Err(MdpError::RaggedGrid {
                    expected: cols,
                    actual: row.len(),
                });
            }
        }

        // Visual row 0 is the top; internally row 0 is the bottom.
        let flat: Vec<Option<f64>> = layout.into_iter().rev().flatten().collect();
        let cells = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| MdpError::Other(e.into()))?;

        let mut states = IndexSet::new();
        for y in 0..rows {
            for x in 0..cols {
                if cells[[y, x]].is_some() {
                    states.insert(GridPos::new(x as i32, y as i32));
                }
            }
        }
        if states.is_empty() {
            return Err(MdpError::EmptyGrid);
        }

        let mut terminal_set = IndexSet::new();
        for t in terminals {
            if !states.contains(&t) {
                return Err(MdpError::UnknownState(t.to_string()));
            }
            terminal_set.insert(t);
        }
        if !states.contains(&init) {
            return Err(MdpError::UnknownState(init.to_string()));
        }

        let mut grid = Self {
            cells,
            states,
            terminals: terminal_set,
            init,
            gamma,
        };
        grid.normalize_rewards(DEFAULT_REWARD_SUM);
        Ok(grid)
    }

    /// Number of grid rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of grid columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// The configured initial state
    #[must_use]
    pub fn init(&self) -> GridPos {
        self.init
    }

    /// Snapshot of the current reward table, keyed by coordinate
    #[must_use]
    pub fn rewards(&self) -> IndexMap<GridPos, f64> {
        self.states
            .iter()
            .filter_map(|&s| self.cell(s).map(|r| (s, r)))
            .collect()
    }

    fn cell(&self, pos: GridPos) -> Option<f64> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.cells
            .get((pos.y as usize, pos.x as usize))
            .copied()
            .flatten()
    }

    /// The state reached by moving in `direction`: the neighbor if it is
    /// traversable, otherwise the origin (walls, obstacles and the grid
    /// boundary block movement in place).
    #[must_use]
    pub fn go(&self, from: GridPos, direction: Compass) -> GridPos {
        let next = from.step(direction);
        if self.states.contains(&next) {
            next
        } else {
            from
        }
    }

    /// Rescale every non-obstacle reward by a single factor so the
    /// signed sum becomes `target`. The divisor carries
    /// [`REWARD_SUM_EPSILON`]; a raw sum within a few epsilon of zero
    /// therefore rescales to something other than `target`.
    pub fn normalize_rewards(&mut self, target: f64) {
        let total: f64 = self.cells.iter().flatten().sum();
        let k = target / (total + REWARD_SUM_EPSILON);
        for reward in self.cells.iter_mut().flatten() {
            *reward *= k;
        }
        debug!(total, factor = k, "normalized rewards");
    }

    /// Nudge the reward of one uniformly chosen traversable cell by
    /// `±step` (sign uniform), then re-normalize. Repeated calls walk
    /// randomly over the space of normalized reward tables.
    pub fn perturb_reward<R: Rng + ?Sized>(&mut self, step: f64, rng: &mut R) {
        let pos = self.states[rng.gen_range(0..self.states.len())];
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        if let Some(reward) = self.cells[[pos.y as usize, pos.x as usize]].as_mut() {
            *reward += sign * step;
        }
        debug!(%pos, delta = sign * step, "perturbed reward");
        self.normalize_rewards(DEFAULT_REWARD_SUM);
    }

    /// Convert a coordinate-keyed mapping back into a visual grid
    /// (row 0 on top); coordinates absent from the mapping become
    /// `None`.
    pub fn to_grid<V: Clone>(&self, mapping: &IndexMap<GridPos, V>) -> Array2<Option<V>> {
        let rows = self.rows();
        Array2::from_shape_fn((rows, self.cols()), |(r, c)| {
            mapping
                .get(&GridPos::new(c as i32, (rows - 1 - r) as i32))
                .cloned()
        })
    }

    /// Render a policy as directional glyphs, `'.'` for the terminal
    /// no-op
    pub fn to_arrows(&self, policy: &Policy<GridPos, Compass>) -> Array2<Option<char>> {
        let glyphs: IndexMap<GridPos, char> = policy
            .iter()
            .map(|(&s, a)| (s, a.map_or('.', |d| d.arrow())))
            .collect();
        self.to_grid(&glyphs)
    }
}

impl TransitionModel for GridMdp {
    type State = GridPos;
    type Action = Compass;

    fn transitions(
        &self,
        state: &GridPos,
        action: Option<&Compass>,
    ) -> Vec<Transition<GridPos>> {
        match action {
            // Zero-weight self-loop so terminal sums stay well-defined.
            None => vec![Transition {
                probability: 0.0,
                state: *state,
            }],
            Some(&direction) => vec![Transition {
                probability: 1.0,
                state: self.go(*state, direction),
            }],
        }
    }
}

impl Mdp for GridMdp {
    fn states(&self) -> &IndexSet<GridPos> {
        &self.states
    }

    fn action_list(&self) -> &[Compass] {
        &Compass::ALL
    }

    fn is_terminal(&self, state: &GridPos) -> bool {
        self.terminals.contains(state)
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn reward(&self, state: &GridPos) -> Result<f64> {
        self.cell(*state)
            .ok_or_else(|| MdpError::UndefinedReward(state.to_string()))
    }
}
