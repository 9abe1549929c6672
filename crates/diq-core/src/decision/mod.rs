//! Decision domain module.
//!
//! # Module Structure
//!
//! - `model`: Decision record, outcome and draft
//! - `store`: The in-memory, newest-first decision collection
//! - `stats`: Guarded aggregate helpers and the dashboard summary

mod model;
mod stats;
mod store;

pub use model::{DecisionDraft, DecisionId, DecisionRecord, Outcome, SCORE_MAX, SCORE_MIN};
pub use stats::{DecisionSummary, guarded_divide};
pub use store::DecisionStore;
