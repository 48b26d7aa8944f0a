//! Combined daily + hourly demand view consumed by the stockout predictor
//! and the prep scheduler.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockwise_core::ForecastPolicy;

use crate::demand::DailyForecast;
use crate::hourly::HourlyCurve;

/// Daily forecast plus an hourly curve for one (store, SKU).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandProfile {
    pub daily: DailyForecast,
    pub curve: HourlyCurve,
}

impl DemandProfile {
    pub fn new(daily: DailyForecast, curve: HourlyCurve) -> Self {
        Self { daily, curve }
    }

    /// Calendar-aware daily point estimate.
    pub fn predicted_daily(&self, date: NaiveDate) -> f64 {
        self.daily.predicted_for(date)
    }

    /// Demand expected in one hour slot of `date`, with the peak buffer
    /// applied. The curve shape is rescaled to the date's daily estimate so
    /// weekends draw down faster than weekdays.
    pub fn hourly_demand(&self, date: NaiveDate, hour: u32, policy: &ForecastPolicy) -> f64 {
        let curve_total = self.curve.daily_total();
        if curve_total <= f64::EPSILON {
            return 0.0;
        }
        let scale = self.predicted_daily(date) / curve_total;
        self.curve.buffered_demand_at(hour, policy.peak_buffer) * scale.max(0.0)
    }
}
