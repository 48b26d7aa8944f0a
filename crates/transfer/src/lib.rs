//! Cross-store transfer recommendations: donor/receiver matching with
//! deterministic tie-breaks.
//!
//! Recommendations are advisory and ephemeral; committing one onto the
//! ledger is a separate, idempotent action owned by the time series store.

pub mod recommender;
pub mod summary;

pub use recommender::{StoreCoverage, TransferRecommendation, recommend_for_sku, urgency};
pub use summary::{TransferSummary, summarize};
