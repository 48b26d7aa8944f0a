//! Prep task derivation.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use stockwise_core::{AnalyticsPolicy, PeakPeriod, SkuId};
use stockwise_forecast::DemandProfile;
use stockwise_stockout::StockoutPrediction;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrepPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl PrepPriority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One SKU's inputs to the scheduler, assembled by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepItem {
    pub sku_id: SkuId,
    pub sku_name: String,
    pub category: String,
    pub on_hand: u32,
    pub prediction: StockoutPrediction,
    pub profile: DemandProfile,
}

/// A scheduled prep task. Overdue tasks are surfaced, never dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepTask {
    pub sku_id: SkuId,
    pub sku_name: String,
    pub category: String,
    pub prep_by: NaiveDateTime,
    pub qty_to_prep: u32,
    pub reason: String,
    pub priority: PrepPriority,
    pub overdue: bool,
    pub stockout_at: NaiveDateTime,
    pub peak: Option<PeakPeriod>,
    pub current_on_hand: u32,
}

/// Whole hours from `hour` to the next peak window opening later the same
/// day, if any.
fn hours_to_next_peak(hour: u32) -> Option<i64> {
    if hour < 11 {
        Some((11 - hour) as i64)
    } else if (14..17).contains(&hour) {
        Some((17 - hour) as i64)
    } else {
        None
    }
}

/// Demand expected from the stockout hour through the rest of its peak
/// window, or the next few hours when the breach is off-peak.
fn window_demand(
    profile: &DemandProfile,
    stockout_at: NaiveDateTime,
    peak: Option<PeakPeriod>,
    policy: &AnalyticsPolicy,
) -> f64 {
    let date = stockout_at.date();
    let from = stockout_at.time().hour();
    let until = match peak {
        Some(window) => window.end_hour(),
        None => (from + policy.prep.offpeak_cover_hours).min(policy.hours.close_hour),
    };
    (from..until)
        .map(|hour| profile.hourly_demand(date, hour, &policy.forecast))
        .sum()
}

fn priority_for(
    peak: Option<PeakPeriod>,
    stockout_at: NaiveDateTime,
    now: NaiveDateTime,
    deficit: f64,
    daily_demand: f64,
    policy: &AnalyticsPolicy,
) -> PrepPriority {
    if peak.is_some() {
        return PrepPriority::Critical;
    }
    let near_peak = hours_to_next_peak(stockout_at.time().hour())
        .map(|h| h <= policy.prep.near_peak_hours)
        .unwrap_or(false);
    let severe = daily_demand > 0.0 && deficit >= policy.prep.high_deficit_ratio * daily_demand;
    if near_peak || severe {
        PrepPriority::High
    } else if stockout_at.date() == now.date() {
        PrepPriority::Medium
    } else {
        PrepPriority::Low
    }
}

/// Build the prep task list for a store, ordered by prep-by time.
pub fn build_schedule(
    items: &[PrepItem],
    now: NaiveDateTime,
    policy: &AnalyticsPolicy,
) -> Vec<PrepTask> {
    let mut tasks: Vec<PrepTask> = items
        .iter()
        .filter_map(|item| {
            let StockoutPrediction::Stockout { at, peak, deficit, .. } = item.prediction else {
                return None;
            };
            let prep_by = at - Duration::hours(policy.prep.lead_time_hours);
            let overdue = prep_by <= now;

            let cover = window_demand(&item.profile, at, peak, policy);
            let qty_to_prep = ((deficit + cover) * policy.prep.prep_buffer).ceil() as u32;

            let priority = priority_for(
                peak,
                at,
                now,
                deficit,
                item.profile.daily.daily_demand,
                policy,
            );

            let reason = match (priority, peak) {
                (PrepPriority::Critical, Some(window)) => format!(
                    "Will run out at {} during the {} rush. Prep immediately!",
                    at.format("%I:%M %p"),
                    window.label()
                ),
                _ => format!(
                    "Will run out at {}. Prep by {}.",
                    at.format("%I:%M %p"),
                    prep_by.format("%I:%M %p")
                ),
            };

            Some(PrepTask {
                sku_id: item.sku_id,
                sku_name: item.sku_name.clone(),
                category: item.category.clone(),
                prep_by,
                qty_to_prep,
                reason,
                priority,
                overdue,
                stockout_at: at,
                peak,
                current_on_hand: item.on_hand,
            })
        })
        .collect();

    tasks.sort_by(|a, b| a.prep_by.cmp(&b.prep_by).then(a.sku_id.cmp(&b.sku_id)));
    tasks
}
