//! Daily demand estimation with weekday/weekend split.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use stockwise_core::{ForecastPolicy, is_weekend};
use stockwise_timeseries::SalesDaily;

/// How much history backs the forecast.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastConfidence {
    Low,
    Medium,
    High,
}

impl ForecastConfidence {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One projected day.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrediction {
    pub date: NaiveDate,
    pub predicted_demand: f64,
    pub is_weekend: bool,
}

/// Daily demand forecast for one (store, SKU).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Robust central estimate: decayed weekday/weekend means recombined 5:2.
    pub daily_demand: f64,
    /// Population standard deviation of the window.
    pub demand_std: f64,
    pub weekday_avg: f64,
    pub weekend_avg: f64,
    pub confidence: ForecastConfidence,
    pub data_points: usize,
    /// True when history fell below the minimum and the population default
    /// was substituted. An estimation tag, not an error.
    pub fallback: bool,
    pub next_7_days: Vec<DailyPrediction>,
}

impl DailyForecast {
    /// Calendar-aware point estimate for a future date.
    pub fn predicted_for(&self, date: NaiveDate) -> f64 {
        if self.fallback {
            return self.daily_demand;
        }
        if is_weekend(date) {
            self.weekend_avg
        } else {
            self.weekday_avg
        }
    }
}

/// Weighted moving average with exponential decay; the most recent value
/// (last in the slice) gets the highest weight.
pub fn weighted_average(values_oldest_first: &[f64], decay: f64) -> f64 {
    if values_oldest_first.is_empty() {
        return 0.0;
    }
    let n = values_oldest_first.len();
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for (i, v) in values_oldest_first.iter().enumerate() {
        let weight = decay.powi((n - 1 - i) as i32);
        weighted_sum += v * weight;
        weight_sum += weight;
    }
    if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        0.0
    }
}

fn population_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

fn next_days(from: NaiveDate, count: usize, predict: impl Fn(NaiveDate) -> f64) -> Vec<DailyPrediction> {
    (1..=count as u64)
        .filter_map(|offset| from.checked_add_days(Days::new(offset)))
        .map(|date| DailyPrediction {
            date,
            predicted_demand: predict(date),
            is_weekend: is_weekend(date),
        })
        .collect()
}

/// Forecast daily demand from ordered history.
///
/// `discounted` dates (flagged anomaly days) are excluded from the
/// estimate. Fewer observations than the policy minimum falls back to the
/// population default with confidence forced low — never an error.
pub fn forecast_daily(
    history: &[SalesDaily],
    discounted: &[NaiveDate],
    today: NaiveDate,
    policy: &ForecastPolicy,
) -> DailyForecast {
    let included: Vec<&SalesDaily> = history
        .iter()
        .filter(|row| !discounted.contains(&row.date))
        .collect();

    if included.len() < policy.min_observations {
        let default = policy.default_daily_demand;
        return DailyForecast {
            daily_demand: default,
            demand_std: 0.0,
            weekday_avg: default,
            weekend_avg: default,
            confidence: ForecastConfidence::Low,
            data_points: included.len(),
            fallback: true,
            next_7_days: next_days(today, 7, |_| default),
        };
    }

    let weekday: Vec<f64> = included
        .iter()
        .filter(|row| !is_weekend(row.date))
        .map(|row| row.qty_sold as f64)
        .collect();
    let weekend: Vec<f64> = included
        .iter()
        .filter(|row| is_weekend(row.date))
        .map(|row| row.qty_sold as f64)
        .collect();

    let weekday_avg = weighted_average(&weekday, policy.decay);
    let weekend_avg = weighted_average(&weekend, policy.decay);
    let daily_demand = if weekday_avg > 0.0 || weekend_avg > 0.0 {
        (weekday_avg * 5.0 + weekend_avg * 2.0) / 7.0
    } else {
        0.0
    };

    let all: Vec<f64> = included.iter().map(|row| row.qty_sold as f64).collect();
    let demand_std = population_std(&all);

    let coverage = included.len() as f64 / policy.lookback_days as f64;
    let confidence = if coverage >= policy.high_coverage {
        ForecastConfidence::High
    } else if coverage >= policy.medium_coverage {
        ForecastConfidence::Medium
    } else {
        ForecastConfidence::Low
    };

    let next_7_days = next_days(today, 7, |date| {
        if is_weekend(date) { weekend_avg } else { weekday_avg }
    });

    DailyForecast {
        daily_demand,
        demand_std,
        weekday_avg,
        weekend_avg,
        confidence,
        data_points: included.len(),
        fallback: false,
        next_7_days,
    }
}
