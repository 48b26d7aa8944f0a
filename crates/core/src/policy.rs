//! Tunable analytics policy.
//!
//! Every weight and threshold the engine applies — deduction amounts, cover
//! targets, decay factors, peak buffers — lives here rather than inline in
//! component code, so deployments can tune them without a rebuild.

use serde::{Deserialize, Serialize};

use crate::calendar::OperatingHours;

/// Demand forecasting knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPolicy {
    /// Lookback window in days for the daily forecast.
    pub lookback_days: u32,
    /// Exponential decay applied per step away from the most recent sample.
    pub decay: f64,
    /// Below this many observations the forecast falls back to
    /// `default_daily_demand` (tagged, confidence forced low).
    pub min_observations: usize,
    /// Population/category default demand used by the fallback.
    pub default_daily_demand: f64,
    /// Window coverage ratio at or above which confidence is high.
    pub high_coverage: f64,
    /// Window coverage ratio at or above which confidence is medium.
    pub medium_coverage: f64,
    /// Daily demand below this floor is treated as "no demand" for
    /// cover/stockout math.
    pub demand_floor: f64,
    /// Cap reported for days-of-cover when demand is below the floor.
    pub max_days_of_cover: f64,
    /// Multiplier applied to per-slot predictions inside peak windows.
    pub peak_buffer: f64,
    /// Supplier lead time assumed by the reorder point.
    pub lead_time_days: u32,
    /// Safety stock expressed in days of demand.
    pub safety_stock_days: u32,
    /// Service-level z factor applied to demand_std in safety stock.
    pub service_level_z: f64,
    /// Days of demand covered by a recommended order.
    pub order_horizon_days: u32,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            lookback_days: 28,
            decay: 0.95,
            min_observations: 5,
            default_daily_demand: 1.0,
            high_coverage: 0.8,
            medium_coverage: 0.5,
            demand_floor: 0.1,
            max_days_of_cover: 999.0,
            peak_buffer: 1.15,
            lead_time_days: 3,
            safety_stock_days: 2,
            service_level_z: 1.65,
            order_horizon_days: 14,
        }
    }
}

/// Anomaly detection knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPolicy {
    /// Floor on the σ used for severity scaling; keeps near-constant series
    /// from flagging every unit of noise.
    pub sigma_floor: f64,
    /// |residual| above this many σ is flagged medium.
    pub medium_sigma: f64,
    /// |residual| above this many σ is flagged high.
    pub high_sigma: f64,
    /// Same-direction share of residuals above which a systematic pattern
    /// is reported.
    pub direction_ratio: f64,
    /// Same-weekday recurrences (same direction) needed for a weekday
    /// cadence pattern.
    pub weekday_recurrence_min: usize,
}

impl Default for AnomalyPolicy {
    fn default() -> Self {
        Self {
            sigma_floor: 1.0,
            medium_sigma: 1.0,
            high_sigma: 2.0,
            direction_ratio: 0.6,
            weekday_recurrence_min: 3,
        }
    }
}

/// Confidence scoring deduction weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidencePolicy {
    /// Per-anomaly deduction, medium severity.
    pub medium_anomaly_penalty: f64,
    /// Per-anomaly deduction, high severity.
    pub high_anomaly_penalty: f64,
    /// Cap on the summed per-anomaly deductions.
    pub anomaly_penalty_cap: f64,
    /// Deduction per unit of cumulative |residual|.
    pub magnitude_penalty_per_unit: f64,
    /// Cap on the magnitude deduction.
    pub magnitude_penalty_cap: f64,
    /// Days without a cycle count before staleness starts deducting.
    pub staleness_threshold_days: i64,
    /// Deduction per day beyond the staleness threshold.
    pub staleness_penalty_per_day: f64,
    /// Cap on the staleness deduction.
    pub staleness_penalty_cap: f64,
    /// Flat deduction when the key was never counted.
    pub never_counted_penalty: f64,
    /// A perishable SKU uncounted for longer than this draws the
    /// perishable penalty.
    pub perishable_uncounted_days: i64,
    /// Flat perishable-without-recent-count deduction.
    pub perishable_penalty: f64,
    /// Flat deduction when a systematic pattern is present.
    pub pattern_penalty: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            medium_anomaly_penalty: 4.0,
            high_anomaly_penalty: 6.0,
            anomaly_penalty_cap: 30.0,
            magnitude_penalty_per_unit: 0.5,
            magnitude_penalty_cap: 20.0,
            staleness_threshold_days: 14,
            staleness_penalty_per_day: 0.6,
            staleness_penalty_cap: 20.0,
            never_counted_penalty: 30.0,
            perishable_uncounted_days: 7,
            perishable_penalty: 10.0,
            pattern_penalty: 15.0,
        }
    }
}

/// Per-unit transfer cost model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostModel {
    /// distance_km × rate.
    PerKm { rate: f64 },
    /// Flat amount per transfer regardless of distance.
    Flat { amount: f64 },
}

impl CostModel {
    pub fn cost(&self, distance_km: f64) -> f64 {
        match self {
            CostModel::PerKm { rate } => distance_km * rate,
            CostModel::Flat { amount } => *amount,
        }
    }
}

/// Transfer recommendation knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPolicy {
    /// Cover level receivers are lifted toward; stores below it are
    /// receivers.
    pub target_cover_days: f64,
    /// Donors are never drawn below this cover.
    pub donor_safety_cover_days: f64,
    /// Receivers below this urgency are not served.
    pub min_urgency: f64,
    /// Cap on a single move, in days of receiver demand.
    pub max_supply_days: f64,
    /// Cost model applied to the donor→receiver distance.
    pub cost_model: CostModel,
    /// Distance assumed when the matrix has no entry for a pair.
    pub default_distance_km: f64,
    /// Savings credited per prevented stockout in the summary.
    pub stockout_cost_estimate: f64,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            target_cover_days: 5.0,
            donor_safety_cover_days: 3.0,
            min_urgency: 0.0,
            max_supply_days: 7.0,
            cost_model: CostModel::PerKm { rate: 1.2 },
            default_distance_km: 1000.0,
            stockout_cost_estimate: 50.0,
        }
    }
}

/// Peak-hour prep scheduling knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepPolicy {
    /// Hours of lead time between "prep by" and the predicted stockout.
    pub lead_time_hours: i64,
    /// Multiplier on the prep quantity.
    pub prep_buffer: f64,
    /// Hours of demand covered when the stockout is outside a peak window.
    pub offpeak_cover_hours: u32,
    /// A stockout this close (hours) before a peak window is rated high.
    pub near_peak_hours: i64,
    /// Deficit at or above this fraction of a day's demand is rated high.
    pub high_deficit_ratio: f64,
}

impl Default for PrepPolicy {
    fn default() -> Self {
        Self {
            lead_time_hours: 2,
            prep_buffer: 1.1,
            offpeak_cover_hours: 2,
            near_peak_hours: 1,
            high_deficit_ratio: 0.5,
        }
    }
}

/// Acceptable range for one sensor kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorBound {
    pub sensor: String,
    pub min: f64,
    pub max: f64,
}

/// Telemetry evaluation knobs.
///
/// Readings are evaluated raw — calibration belongs to the ingestion
/// collaborator, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPolicy {
    /// A latest reading older than this is reported stale.
    pub stale_after_minutes: i64,
    /// Out-of-range bounds per sensor id.
    pub sensor_bounds: Vec<SensorBound>,
}

impl TelemetryPolicy {
    pub fn bound_for(&self, sensor: &str) -> Option<&SensorBound> {
        self.sensor_bounds.iter().find(|b| b.sensor == sensor)
    }
}

impl Default for TelemetryPolicy {
    fn default() -> Self {
        Self {
            stale_after_minutes: 30,
            sensor_bounds: vec![
                SensorBound {
                    sensor: "cooler_temp_c".to_string(),
                    min: -2.0,
                    max: 5.0,
                },
                SensorBound {
                    sensor: "cooler_humidity_pct".to_string(),
                    min: 20.0,
                    max: 60.0,
                },
            ],
        }
    }
}

/// Top-level engine policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsPolicy {
    pub forecast: ForecastPolicy,
    pub anomaly: AnomalyPolicy,
    pub confidence: ConfidencePolicy,
    pub transfer: TransferPolicy,
    pub prep: PrepPolicy,
    pub telemetry: TelemetryPolicy,
    pub hours: OperatingHours,
    /// Stockout prediction horizon in days.
    pub horizon_days: u32,
}

impl Default for AnalyticsPolicy {
    fn default() -> Self {
        Self {
            forecast: ForecastPolicy::default(),
            anomaly: AnomalyPolicy::default(),
            confidence: ConfidencePolicy::default(),
            transfer: TransferPolicy::default(),
            prep: PrepPolicy::default(),
            telemetry: TelemetryPolicy::default(),
            hours: OperatingHours::default(),
            horizon_days: 14,
        }
    }
}

impl AnalyticsPolicy {
    pub fn with_hours(mut self, hours: OperatingHours) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_horizon_days(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize_from_empty_object() {
        let policy: AnalyticsPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, AnalyticsPolicy::default());
    }

    #[test]
    fn cost_models() {
        assert_eq!(CostModel::PerKm { rate: 2.0 }.cost(10.0), 20.0);
        assert_eq!(CostModel::Flat { amount: 35.0 }.cost(10.0), 35.0);
    }
}
