//! Hourly demand curves.
//!
//! A curve holds 24 slots of absolute demand units whose sum approximates
//! the daily estimate. Curves built from hourly observations are tagged
//! `Observed`; when a key has no hourly data the curve is synthesized from
//! the daily estimate with a generic two-peak intraday shape and tagged
//! `Estimated` so consumers can tell the difference.

use serde::{Deserialize, Serialize};

use stockwise_core::{OperatingHours, PeakPeriod};

/// Whether the curve came from hourly observations or was synthesized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveSource {
    Observed,
    Estimated,
}

/// 24-slot hourly demand curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyCurve {
    slots: [f64; 24],
    pub source: CurveSource,
}

impl HourlyCurve {
    /// Demand units expected in `hour` (no peak buffer applied).
    pub fn demand_at(&self, hour: u32) -> f64 {
        self.slots.get(hour as usize).copied().unwrap_or(0.0)
    }

    /// Per-slot prediction with the peak-hour buffer applied.
    pub fn buffered_demand_at(&self, hour: u32, peak_buffer: f64) -> f64 {
        let base = self.demand_at(hour);
        if PeakPeriod::for_hour(hour).is_some() && base > 0.0 {
            base * peak_buffer
        } else {
            base
        }
    }

    pub fn daily_total(&self) -> f64 {
        self.slots.iter().sum()
    }

    pub fn is_estimated(&self) -> bool {
        self.source == CurveSource::Estimated
    }
}

/// Decayed mean over most-recent-first samples for one hour slot.
pub fn weighted_hour_mean(samples_recent_first: &[f64], decay: f64) -> f64 {
    if samples_recent_first.is_empty() {
        return 0.0;
    }
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for (i, v) in samples_recent_first.iter().enumerate() {
        let weight = decay.powi(i as i32);
        weighted_sum += v * weight;
        weight_sum += weight;
    }
    if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        0.0
    }
}

/// Build an observed curve from per-hour means, rescaled so the slots sum
/// to the daily estimate. Returns `None` when there is nothing to observe
/// (all means zero) — callers then synthesize.
pub fn curve_from_hour_means(means: [f64; 24], daily_demand: f64) -> Option<HourlyCurve> {
    let total: f64 = means.iter().sum();
    if total <= f64::EPSILON {
        return None;
    }
    let scale = if daily_demand > 0.0 {
        daily_demand / total
    } else {
        1.0
    };
    let mut slots = [0.0; 24];
    for (slot, mean) in slots.iter_mut().zip(means.iter()) {
        *slot = mean * scale;
    }
    Some(HourlyCurve {
        slots,
        source: CurveSource::Observed,
    })
}

/// Weight given to peak-window hours in the synthesized shape, relative to
/// a base of 1.0 for other open hours.
const SYNTHETIC_PEAK_WEIGHT: f64 = 2.5;

/// Synthesize a two-peak (lunch/dinner) curve over operating hours from
/// the daily estimate alone. Tagged `Estimated`.
pub fn synthesized_curve(daily_demand: f64, hours: OperatingHours) -> HourlyCurve {
    let mut weights = [0.0; 24];
    let mut total = 0.0;
    for hour in hours.hours() {
        let weight = if PeakPeriod::for_hour(hour).is_some() {
            SYNTHETIC_PEAK_WEIGHT
        } else {
            1.0
        };
        weights[hour as usize] = weight;
        total += weight;
    }

    let mut slots = [0.0; 24];
    if total > 0.0 && daily_demand > 0.0 {
        for (slot, weight) in slots.iter_mut().zip(weights.iter()) {
            *slot = daily_demand * weight / total;
        }
    }
    HourlyCurve {
        slots,
        source: CurveSource::Estimated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_curve_normalizes_to_daily_demand() {
        let mut means = [0.0; 24];
        means[11] = 8.0;
        means[12] = 6.0;
        means[18] = 4.0;
        let curve = curve_from_hour_means(means, 35.0).unwrap();

        assert_eq!(curve.source, CurveSource::Observed);
        assert!((curve.daily_total() - 35.0).abs() < 1e-9);
        // Relative shape preserved.
        assert!(curve.demand_at(11) > curve.demand_at(12));
        assert_eq!(curve.demand_at(3), 0.0);
    }

    #[test]
    fn empty_observations_yield_no_curve() {
        assert!(curve_from_hour_means([0.0; 24], 20.0).is_none());
    }

    #[test]
    fn synthesized_curve_is_tagged_and_two_peaked() {
        let curve = synthesized_curve(32.0, OperatingHours::default());
        assert!(curve.is_estimated());
        assert!((curve.daily_total() - 32.0).abs() < 1e-9);
        // Peak slots carry more than shoulder slots.
        assert!(curve.demand_at(12) > curve.demand_at(9));
        assert!(curve.demand_at(18) > curve.demand_at(15));
        // Closed hours carry nothing.
        assert_eq!(curve.demand_at(2), 0.0);
        assert_eq!(curve.demand_at(23), 0.0);
    }

    #[test]
    fn peak_buffer_applies_only_inside_windows() {
        let curve = synthesized_curve(32.0, OperatingHours::default());
        assert!(curve.buffered_demand_at(12, 1.15) > curve.demand_at(12));
        assert_eq!(curve.buffered_demand_at(9, 1.15), curve.demand_at(9));
    }

    #[test]
    fn recent_samples_dominate_hour_mean() {
        let recent_high = weighted_hour_mean(&[10.0, 2.0, 2.0], 0.95);
        let recent_low = weighted_hour_mean(&[2.0, 10.0, 10.0], 0.95);
        assert!(recent_high > recent_low);
        assert_eq!(weighted_hour_mean(&[], 0.95), 0.0);
    }
}
