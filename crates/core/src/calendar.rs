//! Operating calendar: open hours, peak windows, weekend split.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Daily operating window, half-open in whole hours (`open..close`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub open_hour: u32,
    pub close_hour: u32,
}

impl OperatingHours {
    pub fn new(open_hour: u32, close_hour: u32) -> Self {
        Self {
            open_hour,
            close_hour,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.open_hour && hour < self.close_hour
    }

    /// Open hours of one day, in order.
    pub fn hours(&self) -> std::ops::Range<u32> {
        self.open_hour..self.close_hour
    }

    pub fn slots_per_day(&self) -> u32 {
        self.close_hour.saturating_sub(self.open_hour)
    }
}

impl Default for OperatingHours {
    /// 06:00–22:00 local.
    fn default() -> Self {
        Self::new(6, 22)
    }
}

/// Fixed daily interval of elevated demand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakPeriod {
    /// 11:00–14:00 local.
    Lunch,
    /// 17:00–20:00 local.
    Dinner,
}

impl PeakPeriod {
    /// The peak window containing `hour`, if any.
    pub fn for_hour(hour: u32) -> Option<PeakPeriod> {
        match hour {
            11..=13 => Some(PeakPeriod::Lunch),
            17..=19 => Some(PeakPeriod::Dinner),
            _ => None,
        }
    }

    pub fn start_hour(&self) -> u32 {
        match self {
            PeakPeriod::Lunch => 11,
            PeakPeriod::Dinner => 17,
        }
    }

    /// First hour after the window closes.
    pub fn end_hour(&self) -> u32 {
        match self {
            PeakPeriod::Lunch => 14,
            PeakPeriod::Dinner => 20,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour() && hour < self.end_hour()
    }

    pub fn label(&self) -> &'static str {
        match self {
            PeakPeriod::Lunch => "lunch",
            PeakPeriod::Dinner => "dinner",
        }
    }
}

/// Saturday/Sunday split used by the forecaster.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_windows_cover_lunch_and_dinner() {
        assert_eq!(PeakPeriod::for_hour(11), Some(PeakPeriod::Lunch));
        assert_eq!(PeakPeriod::for_hour(13), Some(PeakPeriod::Lunch));
        assert_eq!(PeakPeriod::for_hour(14), None);
        assert_eq!(PeakPeriod::for_hour(17), Some(PeakPeriod::Dinner));
        assert_eq!(PeakPeriod::for_hour(19), Some(PeakPeriod::Dinner));
        assert_eq!(PeakPeriod::for_hour(20), None);
        assert_eq!(PeakPeriod::for_hour(9), None);
    }

    #[test]
    fn weekend_split_follows_calendar() {
        // 2025-06-07 is a Saturday.
        let sat = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
        assert!(is_weekend(sat));
        assert!(is_weekend(sat.succ_opt().unwrap()));
        assert!(!is_weekend(sat.pred_opt().unwrap()));
    }

    #[test]
    fn operating_hours_half_open() {
        let hours = OperatingHours::default();
        assert!(hours.contains(6));
        assert!(hours.contains(21));
        assert!(!hours.contains(22));
        assert_eq!(hours.slots_per_day(), 16);
    }
}
