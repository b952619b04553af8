use std::collections::{hash_map::Entry, HashMap};
use std::mem;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Reset the environment to its initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Returns** `(next_state, reward, done)`. `next_state` is `None` once the
    /// episode is over, and `reward` is `None` only when stepping an episode that
    /// had already ended. Termination is an ordinary return value, never an error,
    /// so callers must check `done` every step.
    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, Option<f64>, bool);

    /// Choose an action uniformly at random
    fn random_action(&self) -> Self::Action;
}

/// An environment with a finite, enumerable action space
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions
    ///
    /// The returned vec should never be empty, instead specify an action that
    /// represents doing nothing if necessary.
    fn actions(&self) -> Vec<Self::Action>;
}

/// An environment with a finite, enumerable state space
///
/// Required by dynamic programming methods that sweep the full model rather
/// than sampling trajectories.
pub trait DiscreteStateSpace: Environment {
    /// Enumerate every observable state
    fn states(&self) -> Vec<Self::State>;
}

/// Named running totals tracked over an episode
#[derive(Debug, Clone, Default)]
pub struct Report {
    data: HashMap<&'static str, f64>,
}

impl Report {
    /// Initialize a report tracking the given keys, all zeroed
    pub fn new(keys: Vec<&'static str>) -> Self {
        Self {
            data: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }

    /// Entry API over a tracked key
    pub fn entry(&mut self, key: &'static str) -> Entry<'_, &'static str, f64> {
        self.data.entry(key)
    }

    /// Get the current total for a key
    pub fn get(&self, key: &str) -> Option<&f64> {
        self.data.get(key)
    }

    /// Take the accumulated totals, resetting every key to zero
    pub fn take(&mut self) -> HashMap<&'static str, f64> {
        let zeroed = self.data.keys().map(|&k| (k, 0.0)).collect();
        mem::replace(&mut self.data, zeroed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accumulates_and_resets() {
        let mut report = Report::new(vec!["reward", "steps"]);
        report.entry("steps").and_modify(|x| *x += 1.0);
        report.entry("reward").and_modify(|x| *x += -0.04);
        report.entry("steps").and_modify(|x| *x += 1.0);

        let totals = report.take();
        assert_eq!(*totals.get("steps").unwrap(), 2.0, "Steps accumulated");
        assert_eq!(*totals.get("reward").unwrap(), -0.04, "Reward accumulated");

        assert_eq!(*report.get("steps").unwrap(), 0.0, "Take resets totals");
    }
}
