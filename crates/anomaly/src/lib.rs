//! Anomaly detection over inventory drawdown history.
//!
//! Read-only and deterministic: the same history always yields the same
//! flags, explanations, and pattern report. Nothing here mutates the
//! underlying snapshots.

pub mod detector;
pub mod pattern;

pub use detector::{Anomaly, AnomalyCause, AnomalySeverity, DriftObservation, detect};
pub use pattern::{AnomalyPattern, PatternType, find_pattern};
