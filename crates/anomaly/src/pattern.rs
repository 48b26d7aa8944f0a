//! Recurrence scan over the flagged set.

use std::collections::HashMap;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use stockwise_core::AnomalyPolicy;

use crate::detector::Anomaly;

/// Kind of repeating behavior found.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Most residuals share the negative direction.
    SystematicShrink,
    /// Same-direction residuals recur on the same weekday.
    WeekdayRecurrence,
}

impl PatternType {
    pub fn label(self) -> &'static str {
        match self {
            Self::SystematicShrink => "systematic_shrink",
            Self::WeekdayRecurrence => "weekday_recurrence",
        }
    }
}

/// Pattern report over a lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPattern {
    pub has_pattern: bool,
    pub pattern_type: Option<PatternType>,
    /// Flagged anomalies in the window.
    pub frequency: usize,
    /// Cumulative unit loss: sum of |negative residuals|.
    pub total_loss: f64,
    pub negative_ratio: f64,
    /// Lowercase weekday name when a weekday cadence was found.
    pub recurring_weekday: Option<String>,
}

impl AnomalyPattern {
    fn none(frequency: usize, total_loss: f64, negative_ratio: f64) -> Self {
        Self {
            has_pattern: false,
            pattern_type: None,
            frequency,
            total_loss,
            negative_ratio,
            recurring_weekday: None,
        }
    }
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Scan flagged anomalies for repeating behavior.
///
/// Systematic shrink takes precedence; otherwise a weekday cadence of
/// same-direction residuals is reported when it recurs often enough.
pub fn find_pattern(anomalies: &[Anomaly], policy: &AnomalyPolicy) -> AnomalyPattern {
    if anomalies.is_empty() {
        return AnomalyPattern::none(0, 0.0, 0.0);
    }

    let negative: Vec<&Anomaly> = anomalies.iter().filter(|a| a.residual < 0.0).collect();
    let total_loss: f64 = negative.iter().map(|a| a.residual.abs()).sum();
    let negative_ratio = negative.len() as f64 / anomalies.len() as f64;

    if negative_ratio >= policy.direction_ratio {
        return AnomalyPattern {
            has_pattern: true,
            pattern_type: Some(PatternType::SystematicShrink),
            frequency: anomalies.len(),
            total_loss,
            negative_ratio,
            recurring_weekday: None,
        };
    }

    // Same weekday, same direction. Ties resolve to the earliest weekday so
    // the report is stable across runs.
    let mut cadence: HashMap<(Weekday, bool), usize> = HashMap::new();
    for anomaly in anomalies {
        *cadence
            .entry((anomaly.date.weekday(), anomaly.residual < 0.0))
            .or_insert(0) += 1;
    }
    let best = cadence
        .into_iter()
        .filter(|(_, count)| *count >= policy.weekday_recurrence_min)
        .min_by_key(|((weekday, negative), count)| {
            (usize::MAX - count, weekday.num_days_from_monday(), *negative)
        });

    if let Some(((weekday, _), _)) = best {
        return AnomalyPattern {
            has_pattern: true,
            pattern_type: Some(PatternType::WeekdayRecurrence),
            frequency: anomalies.len(),
            total_loss,
            negative_ratio,
            recurring_weekday: Some(weekday_label(weekday).to_string()),
        };
    }

    AnomalyPattern::none(anomalies.len(), total_loss, negative_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{AnomalyCause, AnomalySeverity};
    use chrono::NaiveDate;

    fn anomaly(date: NaiveDate, residual: f64) -> Anomaly {
        Anomaly {
            date,
            residual,
            severity: AnomalySeverity::Medium,
            cause: AnomalyCause::Unexplained,
            explanation: String::new(),
            expected_delta: 0.0,
            actual_delta: residual,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn empty_history_has_no_pattern() {
        let pattern = find_pattern(&[], &AnomalyPolicy::default());
        assert!(!pattern.has_pattern);
        assert_eq!(pattern.frequency, 0);
    }

    #[test]
    fn mostly_negative_residuals_report_systematic_shrink() {
        let anomalies = vec![
            anomaly(day(2), -6.0),
            anomaly(day(5), -4.0),
            anomaly(day(9), -5.0),
            anomaly(day(12), 3.0),
        ];
        let pattern = find_pattern(&anomalies, &AnomalyPolicy::default());

        assert!(pattern.has_pattern);
        assert_eq!(pattern.pattern_type, Some(PatternType::SystematicShrink));
        assert_eq!(pattern.total_loss, 15.0);
        assert_eq!(pattern.negative_ratio, 0.75);
    }

    #[test]
    fn weekday_cadence_is_reported_when_direction_is_mixed() {
        // Three Mondays negative, three offsetting positives elsewhere:
        // negative ratio 0.5 stays under the shrink threshold.
        // 2025-06-02, -09, -16 are Mondays.
        let anomalies = vec![
            anomaly(day(2), -6.0),
            anomaly(day(9), -7.0),
            anomaly(day(16), -5.0),
            anomaly(day(4), 4.0),
            anomaly(day(11), 5.0),
            anomaly(day(19), 6.0),
        ];
        let pattern = find_pattern(&anomalies, &AnomalyPolicy::default());

        assert!(pattern.has_pattern);
        assert_eq!(pattern.pattern_type, Some(PatternType::WeekdayRecurrence));
        assert_eq!(pattern.recurring_weekday.as_deref(), Some("monday"));
        assert_eq!(pattern.total_loss, 18.0);
    }

    #[test]
    fn sporadic_anomalies_report_nothing() {
        let anomalies = vec![anomaly(day(2), -6.0), anomaly(day(11), 5.0)];
        let pattern = find_pattern(&anomalies, &AnomalyPolicy::default());
        assert!(!pattern.has_pattern);
        assert_eq!(pattern.pattern_type, None);
        assert_eq!(pattern.frequency, 2);
    }
}
