/// Environment traits and episode reporting
pub mod env;

/// Grid value types: positions, directions, cells
pub mod grid;

/// The stochastic grid-world environment
pub mod gridworld;

mod util;
