//! Residual computation and severity/cause classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockwise_core::AnomalyPolicy;
use stockwise_forecast::DailyForecast;

/// Severity tier, scaled to the forecast's σ.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Medium,
    High,
}

impl AnomalySeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Likely cause category, chosen by residual sign and that day's recorded
/// movements — never guessed stochastically.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyCause {
    ReceivingError,
    Shrink,
    TransferMismatch,
    UnrecordedReceipt,
    Unexplained,
}

impl AnomalyCause {
    pub fn label(self) -> &'static str {
        match self {
            Self::ReceivingError => "receiving_error",
            Self::Shrink => "shrink",
            Self::TransferMismatch => "transfer_mismatch",
            Self::UnrecordedReceipt => "unrecorded_receipt",
            Self::Unexplained => "unexplained",
        }
    }
}

/// One day of drawdown evidence: consecutive snapshots plus the recorded
/// movements between them. Assembled by the caller from the store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftObservation {
    pub date: NaiveDate,
    pub prior_on_hand: u32,
    pub on_hand: u32,
    pub receipts: u32,
    pub transfers_in: u32,
    pub transfers_out: u32,
    /// Recorded daily sales, if the day has a sales row. Only used for
    /// explanation wording; the expected delta uses the forecast.
    pub recorded_sales: Option<u32>,
}

/// A flagged deviation between expected and actual drawdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    /// actual − expected delta; negative means unexplained loss.
    pub residual: f64,
    pub severity: AnomalySeverity,
    pub cause: AnomalyCause,
    pub explanation: String,
    pub expected_delta: f64,
    pub actual_delta: f64,
}

/// Flag deviations across a history window.
///
/// Expected delta per day = receipts + transfers-in − transfers-out −
/// forecast demand for that date. |residual| above the policy's σ
/// multiples is flagged (σ floored so near-constant series don't flag
/// noise).
pub fn detect(
    observations: &[DriftObservation],
    forecast: &DailyForecast,
    policy: &AnomalyPolicy,
) -> Vec<Anomaly> {
    let sigma = forecast.demand_std.max(policy.sigma_floor);
    let mut anomalies = Vec::new();

    for obs in observations {
        let expected_demand = forecast.predicted_for(obs.date);
        let expected_delta = obs.receipts as f64 + obs.transfers_in as f64
            - obs.transfers_out as f64
            - expected_demand;
        let actual_delta = obs.on_hand as f64 - obs.prior_on_hand as f64;
        let residual = actual_delta - expected_delta;

        let severity = if residual.abs() > policy.high_sigma * sigma {
            AnomalySeverity::High
        } else if residual.abs() > policy.medium_sigma * sigma {
            AnomalySeverity::Medium
        } else {
            continue;
        };

        let cause = classify_cause(obs, residual);
        let explanation = explain(obs, residual, expected_delta, actual_delta, cause);

        anomalies.push(Anomaly {
            date: obs.date,
            residual,
            severity,
            cause,
            explanation,
            expected_delta,
            actual_delta,
        });
    }

    anomalies
}

fn classify_cause(obs: &DriftObservation, residual: f64) -> AnomalyCause {
    if residual > 0.0 {
        return AnomalyCause::UnrecordedReceipt;
    }
    if obs.receipts > 0 {
        AnomalyCause::ReceivingError
    } else if obs.recorded_sales.unwrap_or(0) > 0 {
        AnomalyCause::Shrink
    } else if obs.transfers_in > 0 || obs.transfers_out > 0 {
        AnomalyCause::TransferMismatch
    } else {
        AnomalyCause::Unexplained
    }
}

fn explain(
    obs: &DriftObservation,
    residual: f64,
    expected_delta: f64,
    actual_delta: f64,
    cause: AnomalyCause,
) -> String {
    let missing = residual.abs();
    match cause {
        AnomalyCause::ReceivingError => format!(
            "Expected +{} units from shipment, but inventory changed by {actual_delta:+.0} units. \
             Possible receiving error or damage during receiving. Missing {missing:.0} units.",
            obs.receipts
        ),
        AnomalyCause::Shrink => format!(
            "Expected -{} units from sales, but inventory dropped by {:.0} units. \
             Possible shrink or unrecorded sales. Missing {missing:.0} units.",
            obs.recorded_sales.unwrap_or(0),
            actual_delta.abs()
        ),
        AnomalyCause::TransferMismatch => format!(
            "Expected change of {expected_delta:+.0} units including transfers, but actual change \
             was {actual_delta:+.0}. Transfer discrepancy of {missing:.0} units."
        ),
        AnomalyCause::UnrecordedReceipt => format!(
            "Inventory gained {missing:.0} units beyond recorded movements. \
             Possible unrecorded receipt or count error."
        ),
        AnomalyCause::Unexplained => format!(
            "Inventory dropped by {missing:.0} units with no recorded transactions. \
             Likely damage or a system error."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwise_forecast::ForecastConfidence;

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

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn quiet_day(d: u32, prior: u32, current: u32) -> DriftObservation {
        DriftObservation {
            date: day(d),
            prior_on_hand: prior,
            on_hand: current,
            receipts: 0,
            transfers_in: 0,
            transfers_out: 0,
            recorded_sales: Some(prior.saturating_sub(current)),
        }
    }

    #[test]
    fn expected_drawdown_is_not_flagged() {
        // Demand 10/day, σ 2: losing exactly 10 is expected.
        let anomalies = detect(&[quiet_day(2, 50, 40)], &forecast(10.0, 2.0), &AnomalyPolicy::default());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn severity_scales_with_sigma() {
        let fc = forecast(10.0, 2.0);
        let policy = AnomalyPolicy::default();
        // Residual -3: between 1σ and 2σ -> medium.
        let medium = detect(&[quiet_day(2, 50, 37)], &fc, &policy);
        assert_eq!(medium[0].severity, AnomalySeverity::Medium);
        // Residual -8: beyond 2σ -> high.
        let high = detect(&[quiet_day(2, 50, 32)], &fc, &policy);
        assert_eq!(high[0].severity, AnomalySeverity::High);
        assert_eq!(high[0].cause, AnomalyCause::Shrink);
        assert!(high[0].explanation.contains("shrink"));
    }

    #[test]
    fn sigma_floor_suppresses_noise_on_flat_series() {
        // σ=0 would otherwise flag a one-unit wiggle.
        let fc = forecast(10.0, 0.0);
        let mut obs = quiet_day(2, 50, 41);
        obs.recorded_sales = Some(9);
        let anomalies = detect(&[obs], &fc, &AnomalyPolicy::default());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn receiving_day_losses_blame_receiving() {
        let fc = forecast(10.0, 2.0);
        let obs = DriftObservation {
            date: day(3),
            prior_on_hand: 40,
            on_hand: 52, // expected 40 + 30 - 10 = 60
            receipts: 30,
            transfers_in: 0,
            transfers_out: 0,
            recorded_sales: Some(10),
        };
        let anomalies = detect(&[obs], &fc, &AnomalyPolicy::default());
        assert_eq!(anomalies[0].cause, AnomalyCause::ReceivingError);
        assert_eq!(anomalies[0].severity, AnomalySeverity::High);
        assert!(anomalies[0].explanation.contains("+30 units from shipment"));
    }

    #[test]
    fn surplus_flags_unrecorded_receipt() {
        let fc = forecast(10.0, 2.0);
        // Dropped only 2 against demand 10 -> residual +8.
        let anomalies = detect(&[quiet_day(4, 50, 48)], &fc, &AnomalyPolicy::default());
        assert_eq!(anomalies[0].cause, AnomalyCause::UnrecordedReceipt);
        assert!(anomalies[0].residual > 0.0);
    }

    #[test]
    fn transfer_days_blame_the_transfer() {
        let fc = forecast(10.0, 2.0);
        let obs = DriftObservation {
            date: day(5),
            prior_on_hand: 60,
            on_hand: 30, // expected 60 - 12 - 10 = 38
            receipts: 0,
            transfers_in: 0,
            transfers_out: 12,
            recorded_sales: None,
        };
        let anomalies = detect(&[obs], &fc, &AnomalyPolicy::default());
        assert_eq!(anomalies[0].cause, AnomalyCause::TransferMismatch);
    }

    #[test]
    fn no_transaction_drop_is_unexplained() {
        let fc = forecast(10.0, 2.0);
        let mut obs = quiet_day(6, 50, 30);
        obs.recorded_sales = None;
        let anomalies = detect(&[obs], &fc, &AnomalyPolicy::default());
        assert_eq!(anomalies[0].cause, AnomalyCause::Unexplained);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: detection over identical history is idempotent —
            /// no hidden ordering or randomness.
            #[test]
            fn detection_is_idempotent(
                deltas in proptest::collection::vec((20u32..80, 0u32..80), 1..20)
            ) {
                let fc = forecast(10.0, 2.0);
                let policy = AnomalyPolicy::default();
                let observations: Vec<DriftObservation> = deltas
                    .iter()
                    .enumerate()
                    .map(|(i, (prior, current))| DriftObservation {
                        date: day(1) + chrono::Days::new(i as u64),
                        prior_on_hand: *prior,
                        on_hand: *current,
                        receipts: 0,
                        transfers_in: 0,
                        transfers_out: 0,
                        recorded_sales: Some(prior.saturating_sub(*current)),
                    })
                    .collect();

                let first = detect(&observations, &fc, &policy);
                let second = detect(&observations, &fc, &policy);
                prop_assert_eq!(first, second);
            }
        }
    }
}
