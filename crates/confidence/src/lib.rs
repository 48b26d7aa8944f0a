//! Confidence scoring: how much to trust the recorded on-hand figure.
//!
//! The score is auditable by construction — every penalty applied appends
//! a deduction string, in order, so a reader can reconstruct the number.

pub mod priority;
pub mod scorer;

pub use priority::{CountCandidate, CountPriority, CycleCountRecommendation, rank_count_priority};
pub use scorer::{ConfidenceGrade, ConfidenceInputs, ConfidenceReport, score};
