//! Deduction-based confidence scoring.

use serde::{Deserialize, Serialize};

use stockwise_anomaly::{Anomaly, AnomalyPattern, AnomalySeverity};
use stockwise_core::ConfidencePolicy;

/// Letter bucket summarizing trust in the on-hand figure.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceGrade {
    A,
    B,
    C,
    D,
    F,
}

impl ConfidenceGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

/// Everything the scorer looks at.
#[derive(Debug, Clone)]
pub struct ConfidenceInputs<'a> {
    pub anomalies: &'a [Anomaly],
    pub pattern: &'a AnomalyPattern,
    /// None when the key was never physically counted.
    pub days_since_count: Option<i64>,
    pub perishable: bool,
}

/// Score plus its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReport {
    pub score: f64,
    pub grade: ConfidenceGrade,
    /// One entry per penalty applied, in application order.
    pub deductions: Vec<String>,
    pub anomaly_count: usize,
    pub days_since_count: Option<i64>,
    pub has_systematic_pattern: bool,
}

/// Score trust in the current on-hand figure.
///
/// Starts at 100 and deducts per policy; clamped to [0, 100]. Monotone:
/// more anomalies or more days uncounted never raise the score.
pub fn score(inputs: &ConfidenceInputs<'_>, policy: &ConfidencePolicy) -> ConfidenceReport {
    let mut score = 100.0;
    let mut deductions = Vec::new();

    // 1. Anomaly frequency, scaled by severity.
    let frequency_penalty: f64 = inputs
        .anomalies
        .iter()
        .map(|a| match a.severity {
            AnomalySeverity::Medium => policy.medium_anomaly_penalty,
            AnomalySeverity::High => policy.high_anomaly_penalty,
        })
        .sum::<f64>()
        .min(policy.anomaly_penalty_cap);
    if frequency_penalty > 0.0 {
        score -= frequency_penalty;
        deductions.push(format!(
            "Anomaly frequency: -{frequency_penalty:.0} ({} events in window)",
            inputs.anomalies.len()
        ));
    }

    // 2. Anomaly magnitude.
    if !inputs.anomalies.is_empty() {
        let total_residual: f64 = inputs.anomalies.iter().map(|a| a.residual.abs()).sum();
        let magnitude_penalty =
            (total_residual * policy.magnitude_penalty_per_unit).min(policy.magnitude_penalty_cap);
        if magnitude_penalty > 0.0 {
            score -= magnitude_penalty;
            deductions.push(format!(
                "Anomaly magnitude: -{magnitude_penalty:.0} ({total_residual:.0} units unexplained)"
            ));
        }
    }

    // 3. Count staleness.
    match inputs.days_since_count {
        Some(days) if days > policy.staleness_threshold_days => {
            let staleness_penalty = ((days - policy.staleness_threshold_days) as f64
                * policy.staleness_penalty_per_day)
                .min(policy.staleness_penalty_cap);
            score -= staleness_penalty;
            deductions.push(format!(
                "Days since count: -{staleness_penalty:.0} ({days} days)"
            ));
        }
        Some(_) => {}
        None => {
            score -= policy.never_counted_penalty;
            deductions.push(format!("Never counted: -{:.0}", policy.never_counted_penalty));
        }
    }

    // 4. Perishable without a recent count.
    let perishable_stale = inputs.perishable
        && inputs
            .days_since_count
            .map(|days| days > policy.perishable_uncounted_days)
            .unwrap_or(true);
    if perishable_stale {
        score -= policy.perishable_penalty;
        deductions.push(format!(
            "Perishable without recent count: -{:.0}",
            policy.perishable_penalty
        ));
    }

    // 5. Systematic pattern.
    if inputs.pattern.has_pattern {
        score -= policy.pattern_penalty;
        deductions.push(format!(
            "Systematic pattern: -{:.0} ({:.0}% negative)",
            policy.pattern_penalty,
            inputs.pattern.negative_ratio * 100.0
        ));
    }

    let final_score = score.clamp(0.0, 100.0);

    ConfidenceReport {
        score: final_score,
        grade: ConfidenceGrade::from_score(final_score),
        deductions,
        anomaly_count: inputs.anomalies.len(),
        days_since_count: inputs.days_since_count,
        has_systematic_pattern: inputs.pattern.has_pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockwise_anomaly::{AnomalyCause, find_pattern};
    use stockwise_core::AnomalyPolicy;

    fn anomaly(d: u32, residual: f64, severity: AnomalySeverity) -> Anomaly {
        Anomaly {
            date: NaiveDate::from_ymd_opt(2025, 6, d).unwrap(),
            residual,
            severity,
            cause: AnomalyCause::Unexplained,
            explanation: String::new(),
            expected_delta: 0.0,
            actual_delta: residual,
        }
    }

    fn no_pattern() -> AnomalyPattern {
        find_pattern(&[], &AnomalyPolicy::default())
    }

    fn policy() -> ConfidencePolicy {
        ConfidencePolicy::default()
    }

    #[test]
    fn clean_recent_key_scores_a() {
        let report = score(
            &ConfidenceInputs {
                anomalies: &[],
                pattern: &no_pattern(),
                days_since_count: Some(3),
                perishable: false,
            },
            &policy(),
        );
        assert_eq!(report.score, 100.0);
        assert_eq!(report.grade, ConfidenceGrade::A);
        assert!(report.deductions.is_empty());
    }

    #[test]
    fn deductions_are_ordered_and_auditable() {
        let anomalies = vec![
            anomaly(2, -8.0, AnomalySeverity::High),
            anomaly(5, -5.0, AnomalySeverity::Medium),
            anomaly(9, -6.0, AnomalySeverity::High),
        ];
        let pattern = find_pattern(&anomalies, &AnomalyPolicy::default());
        let report = score(
            &ConfidenceInputs {
                anomalies: &anomalies,
                pattern: &pattern,
                days_since_count: Some(20),
                perishable: true,
            },
            &policy(),
        );

        // 100 - 16 (frequency) - 9.5 (magnitude) - 3.6 (staleness)
        //     - 10 (perishable) - 15 (pattern) = 45.9
        assert!((report.score - 45.9).abs() < 1e-9);
        assert_eq!(report.grade, ConfidenceGrade::F);
        assert_eq!(report.deductions.len(), 5);
        assert!(report.deductions[0].starts_with("Anomaly frequency"));
        assert!(report.deductions[1].starts_with("Anomaly magnitude"));
        assert!(report.deductions[2].starts_with("Days since count"));
        assert!(report.deductions[3].starts_with("Perishable"));
        assert!(report.deductions[4].starts_with("Systematic pattern"));
        assert!(report.has_systematic_pattern);
    }

    #[test]
    fn never_counted_draws_the_flat_penalty() {
        let report = score(
            &ConfidenceInputs {
                anomalies: &[],
                pattern: &no_pattern(),
                days_since_count: None,
                perishable: false,
            },
            &policy(),
        );
        assert_eq!(report.score, 70.0);
        assert_eq!(report.deductions, vec!["Never counted: -30".to_string()]);
    }

    #[test]
    fn staleness_inside_threshold_is_free() {
        let report = score(
            &ConfidenceInputs {
                anomalies: &[],
                pattern: &no_pattern(),
                days_since_count: Some(14),
                perishable: false,
            },
            &policy(),
        );
        assert_eq!(report.score, 100.0);
    }

    #[test]
    fn score_floors_at_zero() {
        let anomalies: Vec<Anomaly> = (1..=28)
            .map(|d| anomaly(d, -50.0, AnomalySeverity::High))
            .collect();
        let pattern = find_pattern(&anomalies, &AnomalyPolicy::default());
        let report = score(
            &ConfidenceInputs {
                anomalies: &anomalies,
                pattern: &pattern,
                days_since_count: None,
                perishable: true,
            },
            &policy(),
        );
        assert_eq!(report.score, 0.0);
        assert_eq!(report.grade, ConfidenceGrade::F);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: score stays clamped and never increases with more
            /// anomalies.
            #[test]
            fn monotone_in_anomaly_count(count in 0usize..40, days in 0i64..120) {
                let anomalies: Vec<Anomaly> = (0..count)
                    .map(|i| anomaly((i % 28) as u32 + 1, -4.0, AnomalySeverity::Medium))
                    .collect();
                let pattern = no_pattern();
                let fewer = score(
                    &ConfidenceInputs {
                        anomalies: &anomalies[..count.saturating_sub(1)],
                        pattern: &pattern,
                        days_since_count: Some(days),
                        perishable: false,
                    },
                    &policy(),
                );
                let more = score(
                    &ConfidenceInputs {
                        anomalies: &anomalies,
                        pattern: &pattern,
                        days_since_count: Some(days),
                        perishable: false,
                    },
                    &policy(),
                );
                prop_assert!(more.score <= fewer.score);
                prop_assert!((0.0..=100.0).contains(&more.score));
            }

            /// Property: score never increases as the last count ages.
            #[test]
            fn monotone_in_staleness(days in 0i64..200) {
                let pattern = no_pattern();
                let newer = score(
                    &ConfidenceInputs {
                        anomalies: &[],
                        pattern: &pattern,
                        days_since_count: Some(days),
                        perishable: true,
                    },
                    &policy(),
                );
                let older = score(
                    &ConfidenceInputs {
                        anomalies: &[],
                        pattern: &pattern,
                        days_since_count: Some(days + 1),
                        perishable: true,
                    },
                    &policy(),
                );
                prop_assert!(older.score <= newer.score);
            }
        }
    }
}
