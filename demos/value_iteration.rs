use std::collections::HashMap;
use std::error::Error;

use gridworld_mdp::env::{DiscreteActionSpace, DiscreteStateSpace};
use gridworld_mdp::grid::{Direction, Grid, Position};
use gridworld_mdp::gridworld::GridWorld;

/// A value iteration planner
///
/// Sweeps the full transition model exposed by the environment instead of
/// sampling trajectories, backing up state values until they converge, then
/// reads off the greedy policy.
struct ValueIterationPlanner {
    state_value: HashMap<Position, f64>,
    gamma: f64,
    threshold: f64,
}

impl ValueIterationPlanner {
    fn new(gamma: f64) -> Self {
        Self {
            state_value: HashMap::new(),
            gamma,
            threshold: 1e-4,
        }
    }

    fn action_value(&self, env: &GridWorld, state: Position, action: Direction) -> f64 {
        env.transition_distribution(state, action)
            .into_iter()
            .map(|(next, prob)| {
                let (reward, done) = env.reward(next);
                let next_value = if done {
                    0.0
                } else {
                    self.state_value.get(&next).copied().unwrap_or_default()
                };
                prob * (reward + self.gamma * next_value)
            })
            .sum()
    }

    /// Run backups to convergence, returning the number of sweeps
    fn plan(&mut self, env: &GridWorld) -> usize {
        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let mut delta: f64 = 0.0;

            for state in env.states() {
                if !env.is_actionable(state) {
                    continue;
                }

                let best = env
                    .actions()
                    .into_iter()
                    .map(|action| self.action_value(env, state, action))
                    .fold(f64::NEG_INFINITY, f64::max);

                let old = self.state_value.insert(state, best).unwrap_or_default();
                delta = delta.max((old - best).abs());
            }

            if delta < self.threshold {
                break sweeps;
            }
        }
    }

    fn greedy_action(&self, env: &GridWorld, state: Position) -> Direction {
        env.actions()
            .into_iter()
            .max_by(|&a, &b| {
                self.action_value(env, state, a)
                    .total_cmp(&self.action_value(env, state, b))
            })
            .expect("actions are not empty")
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let codes: [[i8; 4]; 3] = [[0, 0, 0, 1], [0, 9, 0, -1], [0, 0, 0, 0]];
    let grid = Grid::parse(&codes)?;
    let env = GridWorld::new(grid)?;

    let mut planner = ValueIterationPlanner::new(0.9);
    let sweeps = planner.plan(&env);
    println!("Converged after {sweeps} sweeps.\n");

    println!("State values:");
    for row in 0..env.row_count() {
        let line = (0..env.column_count())
            .map(|column| {
                let value = planner
                    .state_value
                    .get(&Position::new(row, column))
                    .copied()
                    .unwrap_or_default();
                format!("{value:7.3}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
    }

    println!("\nGreedy policy:");
    for row in 0..env.row_count() {
        let line = (0..env.column_count())
            .map(|column| {
                let position = Position::new(row, column);
                if !env.is_actionable(position) {
                    return " . ";
                }
                match planner.greedy_action(&env, position) {
                    Direction::Up => " ^ ",
                    Direction::Down => " v ",
                    Direction::Left => " < ",
                    Direction::Right => " > ",
                }
            })
            .collect::<Vec<_>>()
            .join("");
        println!("{line}");
    }

    Ok(())
}
