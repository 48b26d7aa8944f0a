//! Forward consumption simulation.

use chrono::{Days, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use stockwise_core::{AnalyticsPolicy, PeakPeriod};
use stockwise_forecast::DemandProfile;

/// Tagged stockout outcome. A key that survives the horizon reports the
/// boundary it is safe until, never a zero-valued timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StockoutPrediction {
    Stockout {
        /// Projected breach time (:30 within the breaching hour).
        at: NaiveDateTime,
        /// Peak window the breach lands in, if any.
        peak: Option<PeakPeriod>,
        /// Whole hours between the simulation start and the breach.
        hours_until: i64,
        /// Units short at the moment of breach.
        deficit: f64,
    },
    Safe {
        /// End of the simulated horizon.
        until: NaiveDateTime,
        /// Units left at the boundary.
        remaining: f64,
    },
}

impl StockoutPrediction {
    pub fn will_stockout(&self) -> bool {
        matches!(self, Self::Stockout { .. })
    }

    pub fn stockout_at(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Stockout { at, .. } => Some(*at),
            Self::Safe { .. } => None,
        }
    }

    pub fn peak(&self) -> Option<PeakPeriod> {
        match self {
            Self::Stockout { peak, .. } => *peak,
            Self::Safe { .. } => None,
        }
    }

    pub fn is_during_peak(&self) -> bool {
        self.peak().is_some()
    }
}

/// Simulate consumption slot-by-slot from `start` until the on-hand would
/// go negative or the horizon ends.
///
/// Monotonic by construction: the per-slot demand sequence is independent
/// of `on_hand`, so more inventory can only push the breach later or off
/// the horizon entirely.
pub fn predict(
    on_hand: u32,
    profile: &DemandProfile,
    start: NaiveDateTime,
    policy: &AnalyticsPolicy,
) -> StockoutPrediction {
    let hours = policy.hours;
    let mut remaining = on_hand as f64;

    for day_offset in 0..policy.horizon_days as u64 {
        let Some(date) = start.date().checked_add_days(Days::new(day_offset)) else {
            break;
        };
        for hour in hours.hours() {
            // Slots already behind the start time don't consume.
            if day_offset == 0 && hour < start.time().hour() {
                continue;
            }
            remaining -= profile.hourly_demand(date, hour, &policy.forecast);
            if remaining <= 0.0 {
                let Some(at) = date.and_hms_opt(hour, 30, 0) else {
                    continue;
                };
                return StockoutPrediction::Stockout {
                    at,
                    peak: PeakPeriod::for_hour(hour),
                    hours_until: (at - start).num_hours(),
                    deficit: remaining.abs(),
                };
            }
        }
    }

    let horizon_days = policy.horizon_days.max(1) as u64;
    let boundary = start
        .date()
        .checked_add_days(Days::new(horizon_days - 1))
        .and_then(|date| date.and_hms_opt(hours.close_hour.min(23), 0, 0))
        .unwrap_or(start);
    StockoutPrediction::Safe {
        until: boundary,
        remaining,
    }
}
