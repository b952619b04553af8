use std::error::Error;

use gridworld_mdp::env::{DiscreteActionSpace, Environment};
use gridworld_mdp::grid::{Direction, Grid, Position};
use gridworld_mdp::gridworld::GridWorld;
use rand::seq::SliceRandom;

/// An agent that picks a direction uniformly at random every step
struct RandomAgent {
    actions: Vec<Direction>,
}

impl RandomAgent {
    fn new(env: &GridWorld) -> Self {
        Self {
            actions: env.actions(),
        }
    }

    fn policy(&self, _state: Position) -> Direction {
        *self
            .actions
            .choose(&mut rand::thread_rng())
            .expect("actions are not empty")
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let codes: [[i8; 4]; 3] = [[0, 0, 0, 1], [0, 9, 0, -1], [0, 0, 0, 0]];
    let grid = Grid::parse(&codes)?;
    let mut env = GridWorld::new(grid)?;
    let agent = RandomAgent::new(&env);

    for episode in 0..10 {
        let mut state = env.reset();
        let mut total_reward = 0.0;

        loop {
            let action = agent.policy(state);
            let (next_state, reward, done) = env.step(action);
            total_reward += reward.unwrap_or_default();
            if let Some(next) = next_state {
                state = next;
            }
            if done {
                break;
            }
        }

        println!("Episode {episode}: agent gets {total_reward:.2} reward.");
    }

    Ok(())
}
