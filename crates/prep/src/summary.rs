//! Peak-period summary for the dashboard.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use stockwise_core::{PeakPeriod, SkuId};
use stockwise_stockout::StockoutPrediction;

use crate::scheduler::PrepItem;

/// A SKU predicted to run out inside a peak window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtRiskItem {
    pub sku_id: SkuId,
    pub sku_name: String,
    pub stockout_at: NaiveDateTime,
    pub peak: PeakPeriod,
    pub hours_until: i64,
}

/// Where the day stands relative to the peak windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSummary {
    pub current_hour: u32,
    pub next_peak: PeakPeriod,
    pub next_peak_start_hour: u32,
    pub hours_until_peak: i64,
    pub minutes_until_peak: i64,
    pub is_currently_peak: bool,
    pub at_risk: Vec<AtRiskItem>,
    pub total_at_risk: usize,
}

/// Summarize peak status and the at-risk list.
pub fn peak_summary(items: &[PrepItem], now: NaiveDateTime) -> PeakSummary {
    let current_hour = now.time().hour();

    let (next_peak, next_peak_start_hour, hours_until_peak) = if current_hour < 11 {
        (PeakPeriod::Lunch, 11, (11 - current_hour) as i64)
    } else if current_hour < 14 {
        (PeakPeriod::Lunch, current_hour, 0)
    } else if current_hour < 17 {
        (PeakPeriod::Dinner, 17, (17 - current_hour) as i64)
    } else if current_hour < 20 {
        (PeakPeriod::Dinner, current_hour, 0)
    } else {
        // Past dinner: tomorrow's lunch.
        (PeakPeriod::Lunch, 11, (24 - current_hour + 11) as i64)
    };

    let at_risk: Vec<AtRiskItem> = items
        .iter()
        .filter_map(|item| {
            let StockoutPrediction::Stockout { at, peak: Some(peak), hours_until, .. } =
                item.prediction
            else {
                return None;
            };
            Some(AtRiskItem {
                sku_id: item.sku_id,
                sku_name: item.sku_name.clone(),
                stockout_at: at,
                peak,
                hours_until,
            })
        })
        .collect();

    PeakSummary {
        current_hour,
        next_peak,
        next_peak_start_hour,
        hours_until_peak,
        minutes_until_peak: hours_until_peak * 60,
        is_currently_peak: hours_until_peak == 0,
        total_at_risk: at_risk.len(),
        at_risk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockwise_forecast::{DailyForecast, DemandProfile, ForecastConfidence, synthesized_curve};
    use stockwise_core::OperatingHours;

    fn time(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn item(name: &str, prediction: StockoutPrediction) -> PrepItem {
        let daily = DailyForecast {
            daily_demand: 20.0,
            demand_std: 0.0,
            weekday_avg: 20.0,
            weekend_avg: 20.0,
            confidence: ForecastConfidence::High,
            data_points: 28,
            fallback: false,
            next_7_days: Vec::new(),
        };
        PrepItem {
            sku_id: SkuId::new(),
            sku_name: name.to_string(),
            category: "Proteins".to_string(),
            on_hand: 10,
            prediction,
            profile: DemandProfile::new(daily, synthesized_curve(20.0, OperatingHours::default())),
        }
    }

    #[test]
    fn morning_counts_down_to_lunch() {
        let summary = peak_summary(&[], time(8));
        assert_eq!(summary.next_peak, PeakPeriod::Lunch);
        assert_eq!(summary.hours_until_peak, 3);
        assert_eq!(summary.minutes_until_peak, 180);
        assert!(!summary.is_currently_peak);
    }

    #[test]
    fn midday_is_inside_lunch() {
        let summary = peak_summary(&[], time(12));
        assert_eq!(summary.next_peak, PeakPeriod::Lunch);
        assert!(summary.is_currently_peak);
    }

    #[test]
    fn late_evening_wraps_to_tomorrows_lunch() {
        let summary = peak_summary(&[], time(21));
        assert_eq!(summary.next_peak, PeakPeriod::Lunch);
        assert_eq!(summary.hours_until_peak, 14);
    }

    #[test]
    fn only_peak_stockouts_are_at_risk() {
        let items = vec![
            item(
                "chicken",
                StockoutPrediction::Stockout {
                    at: time(12),
                    peak: Some(PeakPeriod::Lunch),
                    hours_until: 4,
                    deficit: 3.0,
                },
            ),
            item(
                "rice",
                StockoutPrediction::Stockout {
                    at: time(15),
                    peak: None,
                    hours_until: 7,
                    deficit: 1.0,
                },
            ),
            item(
                "queso",
                StockoutPrediction::Safe {
                    until: time(21),
                    remaining: 40.0,
                },
            ),
        ];
        let summary = peak_summary(&items, time(8));

        assert_eq!(summary.total_at_risk, 1);
        assert_eq!(summary.at_risk[0].sku_name, "chicken");
        assert_eq!(summary.at_risk[0].peak, PeakPeriod::Lunch);
    }
}
