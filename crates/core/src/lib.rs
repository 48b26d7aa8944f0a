//! `stockwise-core` — analytics engine foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no transport):
//! typed identifiers, the engine error taxonomy, the operating calendar, and
//! the tunable analytics policy shared by every component.

pub mod calendar;
pub mod error;
pub mod id;
pub mod policy;

pub use calendar::{OperatingHours, PeakPeriod, is_weekend};
pub use error::{EngineError, EngineResult};
pub use id::{SkuId, StoreId, TransferId};
pub use policy::{
    AnalyticsPolicy, AnomalyPolicy, ConfidencePolicy, CostModel, ForecastPolicy, PrepPolicy,
    SensorBound, TelemetryPolicy, TransferPolicy,
};
