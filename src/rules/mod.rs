//! Puzzle rules.
//!
//! - `simulator`: turn resolution on a `Board` (moves, hazards, doors,
//!   terminal checks)
//! - `problem`: the `Problem` trait search algorithms are written against

pub mod problem;
pub mod simulator;

pub use problem::{Problem, PuzzleProblem};
