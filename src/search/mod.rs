//! State-space search for Lava & Aqua levels.
//!
//! ## Usage
//!
//! ```rust
//! use lava_aqua::core::LevelData;
//! use lava_aqua::rules::PuzzleProblem;
//! use lava_aqua::search::{Algorithm, Search, SearchConfig, SearchOutcome};
//!
//! let level = LevelData::from_json_str(
//!     r#"{"width": 3, "height": 1, "entities": {
//!         "players": [{"position": [0, 0]}],
//!         "goals": [{"position": [2, 0]}]
//!     }}"#,
//! ).unwrap();
//!
//! let mut search = Search::new(PuzzleProblem::from_level(&level), SearchConfig::default());
//! assert_eq!(search.run(Algorithm::AStar).unwrap(), SearchOutcome::Solved);
//! assert_eq!(search.solution_actions().unwrap().len(), 2);
//! ```

pub mod config;
pub mod frontier;
pub mod heuristic;
pub mod node;
pub mod report;
pub mod solver;
pub mod stats;
pub mod tree;

pub use config::SearchConfig;
pub use frontier::PriorityQueue;
pub use heuristic::{lava_count, manhattan_to_goal};
pub use node::{Node, NodeId};
pub use report::RunRecord;
pub use solver::{Algorithm, Search, SearchError, SearchOutcome};
pub use stats::SearchStats;
pub use tree::SearchTree;
