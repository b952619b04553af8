use std::collections::HashMap;

use log::{debug, trace};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{thread_rng, SeedableRng};
use strum::{IntoEnumIterator, VariantArray};

use crate::assert_interval;
use crate::env::{DiscreteActionSpace, DiscreteStateSpace, Environment, Report};
use crate::grid::{Cell, Direction, Grid, GridError, Position};

/// A stochastic grid-world MDP
///
/// A single agent moves between the cells of a rectangular [`Grid`]. Each step
/// the intended direction is executed with probability `move_prob`; otherwise
/// the agent slips to one of the two lateral directions, never the opposite
/// one. Moves into a wall or a blocked cell leave the agent in place. Entering
/// a reward or damage cell ends the episode, and every other transition earns
/// `default_reward`.
///
/// Intended for tabular and dynamic programming methods: besides sampled
/// episodes via [`Environment::step`], the full model is exposed through
/// [`GridWorld::transition_distribution`] and [`DiscreteStateSpace::states`].
pub struct GridWorld {
    grid: Grid,
    move_prob: f64,
    default_reward: f64,
    agent: Position,
    rng: StdRng,
    pub report: Report,
}

impl GridWorld {
    /// Initialize with the usual parameters: `move_prob = 0.8` and
    /// `default_reward = -0.04`
    pub fn new(grid: Grid) -> Result<Self, GridError> {
        Self::with_params(grid, 0.8, -0.04)
    }

    /// Initialize with explicit parameters
    ///
    /// `default_reward` is earned on every non-terminal transition; a small
    /// negative value penalizes long episodes. Fails when the start cell is
    /// not traversable.
    pub fn with_params(grid: Grid, move_prob: f64, default_reward: f64) -> Result<Self, GridError> {
        assert_interval!(move_prob, 0.0, 1.0);

        let start = Position::new(grid.rows() - 1, 0);
        if grid.cell(start) != Cell::Empty {
            return Err(GridError::UntraversableStart(start));
        }

        Ok(Self {
            grid,
            move_prob,
            default_reward,
            agent: start,
            rng: StdRng::from_entropy(),
            report: Report::new(vec!["reward", "steps"]),
        })
    }

    /// Replace the transition RNG with a seeded one for reproducible episodes
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn row_count(&self) -> usize {
        self.grid.rows()
    }

    pub fn column_count(&self) -> usize {
        self.grid.columns()
    }

    /// The fixed episode start, the bottom-left corner of the grid
    pub fn start_position(&self) -> Position {
        Position::new(self.grid.rows() - 1, 0)
    }

    /// Whether an agent can act from this position
    ///
    /// Terminal and blocked cells are not actionable; this is the entry guard
    /// for every transition.
    pub fn is_actionable(&self, position: Position) -> bool {
        self.grid.cell(position) == Cell::Empty
    }

    /// The probability of each resulting position when `action` is intended
    /// at `position`
    ///
    /// The intended direction carries `move_prob`, each lateral direction
    /// carries `(1 - move_prob) / 2`, and the opposite direction carries
    /// nothing. Candidate moves that clamp to the same cell have their mass
    /// summed, so the returned values sum to 1. Empty when `position` is not
    /// actionable.
    pub fn transition_distribution(
        &self,
        position: Position,
        action: Direction,
    ) -> HashMap<Position, f64> {
        let mut probs = HashMap::new();
        if !self.is_actionable(position) {
            return probs;
        }

        let lateral_prob = (1.0 - self.move_prob) / 2.0;
        let opposite = action.opposite();

        for candidate in Direction::iter() {
            let prob = if candidate == action {
                self.move_prob
            } else if candidate == opposite {
                0.0
            } else {
                lateral_prob
            };

            *probs
                .entry(self.next_position(position, candidate))
                .or_insert(0.0) += prob;
        }

        probs
    }

    /// Where a single deterministic move lands
    ///
    /// Moves that would leave the grid or enter a blocked cell are discarded
    /// and the original position is returned.
    ///
    /// # Panics
    /// Panics when `position` is not actionable. Check
    /// [`GridWorld::is_actionable`] first; [`GridWorld::transition_distribution`]
    /// already guards this path.
    pub fn next_position(&self, position: Position, direction: Direction) -> Position {
        assert!(
            self.is_actionable(position),
            "cannot move from non-actionable position {position}"
        );

        let (row, column) = (position.row as isize, position.column as isize);
        let (row, column) = match direction {
            Direction::Up => (row - 1, column),
            Direction::Down => (row + 1, column),
            Direction::Left => (row, column - 1),
            Direction::Right => (row, column + 1),
        };

        if row < 0
            || row >= self.row_count() as isize
            || column < 0
            || column >= self.column_count() as isize
        {
            return position;
        }

        let moved = Position::new(row as usize, column as usize);
        if self.grid.cell(moved) == Cell::Blocked {
            return position;
        }

        moved
    }

    /// The reward for arriving at a position and whether it ends the episode
    pub fn reward(&self, position: Position) -> (f64, bool) {
        match self.grid.cell(position) {
            Cell::Reward => (1.0, true),
            Cell::Damage => (-1.0, true),
            Cell::Empty | Cell::Blocked => (self.default_reward, false),
        }
    }

    /// Draw one next position from the transition distribution
    ///
    /// An empty distribution means the agent already sits on a terminal cell,
    /// reported as episode end with no further state or reward.
    fn sample_transition(
        &mut self,
        state: Position,
        action: Direction,
    ) -> (Option<Position>, Option<f64>, bool) {
        let probs = self.transition_distribution(state, action);
        if probs.is_empty() {
            return (None, None, true);
        }

        let (positions, weights): (Vec<_>, Vec<_>) = probs.into_iter().unzip();
        let dist = WeightedIndex::new(&weights).expect("probabilities are non-negative and sum to 1");
        let next = positions[dist.sample(&mut self.rng)];
        trace!("transition {state} --{action:?}--> {next}");

        let (reward, done) = self.reward(next);
        (Some(next), Some(reward), done)
    }
}

impl Environment for GridWorld {
    type State = Position;
    type Action = Direction;

    fn reset(&mut self) -> Self::State {
        self.agent = self.start_position();
        debug!("episode reset, agent at {}", self.agent);
        self.agent
    }

    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, Option<f64>, bool) {
        let (next_state, reward, done) = self.sample_transition(self.agent, action);
        if let Some(next) = next_state {
            self.agent = next;
        }

        self.report.entry("steps").and_modify(|x| *x += 1.0);
        if let Some(reward) = reward {
            self.report.entry("reward").and_modify(|x| *x += reward);
        }
        if done {
            debug!("episode ended at {}", self.agent);
        }

        (next_state, reward, done)
    }

    fn random_action(&self) -> Self::Action {
        Direction::iter()
            .choose(&mut thread_rng())
            .expect("iterator is not empty")
    }
}

impl DiscreteStateSpace for GridWorld {
    /// Every position in row-major order, blocked cells excluded
    fn states(&self) -> Vec<Self::State> {
        let mut states = Vec::with_capacity(self.row_count() * self.column_count());
        for row in 0..self.row_count() {
            for column in 0..self.column_count() {
                let position = Position::new(row, column);
                if self.grid.cell(position) != Cell::Blocked {
                    states.push(position);
                }
            }
        }

        states
    }
}

impl DiscreteActionSpace for GridWorld {
    fn actions(&self) -> Vec<Self::Action> {
        Direction::VARIANTS.to_vec()
    }
}
