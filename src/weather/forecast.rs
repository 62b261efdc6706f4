//! Reduce 3-hourly forecast samples to one representative per calendar day.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Timelike};

use crate::weather::types::{DailyForecast, ForecastEntry};

/// Maximum number of days returned
pub const MAX_FORECAST_DAYS: usize = 7;

/// Local hour whose sample represents its day
pub const MIDDAY_HOUR: u32 = 12;

/// Zone used to assign forecast samples to calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastZone {
    /// The server's local zone
    #[default]
    Local,

    /// A fixed UTC offset
    Fixed(FixedOffset),
}

impl ForecastZone {
    /// Convert a Unix timestamp to wall-clock time in this zone
    pub fn local_time(&self, timestamp: i64) -> Option<NaiveDateTime> {
        let utc = DateTime::from_timestamp(timestamp, 0)?;
        let local = match self {
            ForecastZone::Local => utc.with_timezone(&Local).naive_local(),
            ForecastZone::Fixed(offset) => utc.with_timezone(offset).naive_local(),
        };
        Some(local)
    }
}

impl From<Option<FixedOffset>> for ForecastZone {
    fn from(offset: Option<FixedOffset>) -> Self {
        offset.map_or(ForecastZone::Local, ForecastZone::Fixed)
    }
}

/// Group samples by calendar date and pick one per day.
///
/// The first sample seen for a date is kept unless a later sample for the
/// same date falls on [`MIDDAY_HOUR`]. Days keep the order in which they were
/// first seen and at most [`MAX_FORECAST_DAYS`] are returned.
pub fn summarize_daily(entries: impl IntoIterator<Item = ForecastEntry>) -> Vec<DailyForecast> {
    let mut days: Vec<DailyForecast> = Vec::new();

    for entry in entries {
        let date = entry.local_time.date();
        let is_midday = entry.local_time.hour() == MIDDAY_HOUR;

        match days.iter_mut().find(|day| day.date == date) {
            Some(day) if is_midday => *day = entry.into(),
            Some(_) => {}
            None => days.push(entry.into()),
        }
    }

    days.truncate(MAX_FORECAST_DAYS);
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(day: u32, hour: u32, temp: f64) -> ForecastEntry {
        ForecastEntry {
            local_time: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            description: format!("day {day} hour {hour}"),
            temp,
            temp_min: temp - 2.0,
            temp_max: temp + 2.0,
            humidity: 60,
        }
    }

    #[test]
    fn test_prefers_midday_sample() {
        let entries = vec![entry(1, 6, 10.0), entry(1, 9, 11.0), entry(1, 12, 15.0), entry(1, 15, 14.0)];

        let days = summarize_daily(entries);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temp, 15.0);
        assert_eq!(days[0].description, "day 1 hour 12");
    }

    #[test]
    fn test_keeps_first_sample_without_midday() {
        let entries = vec![entry(2, 15, 9.0), entry(2, 18, 7.0), entry(2, 21, 5.0)];

        let days = summarize_daily(entries);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temp, 9.0);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn test_caps_at_seven_days_in_first_seen_order() {
        let entries: Vec<_> = (1..=9)
            .flat_map(|day| [entry(day, 0, day as f64), entry(day, 12, day as f64 + 0.5)])
            .collect();

        let days = summarize_daily(entries);
        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 3, i as u32 + 1).unwrap());
            assert_eq!(day.temp, i as f64 + 1.5);
        }
    }

    #[test]
    fn test_midday_replacement_keeps_position() {
        let entries = vec![entry(4, 9, 1.0), entry(5, 9, 2.0), entry(4, 12, 3.0)];

        let days = summarize_daily(entries);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date.to_string(), "2024-03-04");
        assert_eq!(days[0].temp, 3.0);
        assert_eq!(days[1].temp, 2.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize_daily(Vec::new()).is_empty());
    }

    #[test]
    fn test_fixed_zone_conversion() {
        let zone = ForecastZone::from(FixedOffset::east_opt(-5 * 3600));
        // 2024-03-01 03:00:00 UTC
        let local = zone.local_time(1_709_262_000).unwrap();
        assert_eq!(local.to_string(), "2024-02-29 22:00:00");
        assert_eq!(ForecastZone::from(None), ForecastZone::Local);
    }
}
