//! Brute-force Towers of Hanoi solver.
//!
//! This crate walks the space of legal disk moves depth first, avoiding
//! states already on the current path, and reports every solution it
//! reaches. Branch order and whether to stop at the first solution are
//! configurable.

pub mod logging;
pub mod movegen;
pub mod report;
pub mod solver;
pub mod towers;

// Re-export main types
pub use movegen::{legal_moves, MoveCandidate};
pub use report::OutputMode;
pub use solver::{
    solve, BranchMode, NodeId, NodeStatus, SearchNode, SearchOutcome, SearchReport, SearchSummary,
    SeekMode, Solution, Solver, SolverConfig,
};
pub use towers::{Move, State, Towers};
