//! Days-of-cover and reorder-point math.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use stockwise_core::ForecastPolicy;

use crate::demand::DailyForecast;

/// Days until stockout at the current demand rate. Demand below the policy
/// floor reports the cap ("effectively infinite").
pub fn days_of_cover(on_hand: u32, daily_demand: f64, policy: &ForecastPolicy) -> f64 {
    if daily_demand < policy.demand_floor {
        return policy.max_days_of_cover;
    }
    on_hand as f64 / daily_demand
}

/// Calendar date the cover runs out, or `None` when no stockout is
/// expected within the cap.
pub fn stockout_date(today: NaiveDate, cover_days: f64, policy: &ForecastPolicy) -> Option<NaiveDate> {
    if cover_days >= policy.max_days_of_cover {
        return None;
    }
    today.checked_add_days(Days::new(cover_days.max(0.0) as u64))
}

/// Reorder point and recommended order quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderPlan {
    pub reorder_point: f64,
    pub order_qty: f64,
    pub safety_stock: f64,
    pub lead_time_days: u32,
}

/// Reorder point = lead-time demand + safety stock (demand-days plus a
/// service-level allowance on σ); order quantity covers the order horizon.
pub fn reorder_plan(forecast: &DailyForecast, policy: &ForecastPolicy) -> ReorderPlan {
    let safety_stock = forecast.daily_demand * policy.safety_stock_days as f64
        + forecast.demand_std * policy.service_level_z;
    let reorder_point = forecast.daily_demand * policy.lead_time_days as f64 + safety_stock;
    let order_qty = forecast.daily_demand * policy.order_horizon_days as f64;

    ReorderPlan {
        reorder_point: reorder_point.round(),
        order_qty: order_qty.round(),
        safety_stock: safety_stock.round(),
        lead_time_days: policy.lead_time_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::ForecastConfidence;

    fn forecast(daily_demand: f64, demand_std: f64) -> DailyForecast {
        DailyForecast {
            daily_demand,
            demand_std,
            weekday_avg: daily_demand,
            weekend_avg: daily_demand,
            confidence: ForecastConfidence::High,
            data_points: 28,
            fallback: false,
            next_7_days: Vec::new(),
        }
    }

    #[test]
    fn cover_caps_when_demand_is_negligible() {
        let policy = ForecastPolicy::default();
        assert_eq!(days_of_cover(50, 0.05, &policy), policy.max_days_of_cover);
        assert!((days_of_cover(50, 10.0, &policy) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn stockout_date_follows_cover() {
        let policy = ForecastPolicy::default();
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(
            stockout_date(today, 3.7, &policy),
            NaiveDate::from_ymd_opt(2025, 6, 5)
        );
        assert_eq!(stockout_date(today, policy.max_days_of_cover, &policy), None);
    }

    #[test]
    fn reorder_point_includes_service_level_allowance() {
        let policy = ForecastPolicy::default();
        let plan = reorder_plan(&forecast(10.0, 4.0), &policy);
        // 10*3 lead + (10*2 + 4*1.65) safety = 56.6 -> 57.
        assert_eq!(plan.safety_stock, 27.0);
        assert_eq!(plan.reorder_point, 57.0);
        assert_eq!(plan.order_qty, 140.0);
    }
}
