//! Demand forecasting: daily estimates, hourly curves, cover math.
//!
//! Every function here is a pure computation over rows handed in by the
//! caller — no store access, no clock reads. Estimation fallbacks are
//! tagged in the output (`fallback`, `CurveSource::Estimated`), never
//! raised as errors.

pub mod cover;
pub mod demand;
pub mod hourly;
pub mod profile;

pub use cover::{ReorderPlan, days_of_cover, reorder_plan, stockout_date};
pub use demand::{DailyForecast, DailyPrediction, ForecastConfidence, forecast_daily};
pub use hourly::{CurveSource, HourlyCurve, curve_from_hour_means, synthesized_curve, weighted_hour_mean};
pub use profile::DemandProfile;
