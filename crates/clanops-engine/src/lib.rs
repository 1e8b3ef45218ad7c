//! Deterministic greedy assignment of operators to selected missions.
//!
//! Every operator goes to the single selected mission where its score is
//! highest; ties stay with the earliest slot. This is a per-operator local
//! maximum, not a matching: several operators may land on the same mission
//! and nothing balances them across missions.

mod assignment;

pub use assignment::{Assignment, assign, assign_best_operators};

use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum AssignmentError {
    #[error("no mission selected: at least one slot must hold a mission")]
    NoMissionSelected,
}
