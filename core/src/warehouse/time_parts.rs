use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

/// Calendar fields of the `time` dimension, derived in UTC with the same conventions as
/// `EXTRACT`: `week` is the ISO week, `weekday` counts from Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

impl TimeParts {
    /// `None` when the timestamp is outside the range chrono can represent.
    pub fn from_epoch_millis(millis: i64) -> Option<TimeParts> {
        DateTime::from_timestamp_millis(millis).map(|dt| TimeParts::from_datetime(&dt.naive_utc()))
    }

    pub fn from_datetime(dt: &NaiveDateTime) -> TimeParts {
        TimeParts {
            hour: dt.hour(),
            day: dt.day(),
            week: dt.iso_week().week(),
            month: dt.month(),
            year: dt.year(),
            weekday: dt.weekday().num_days_from_sunday(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_timestamp() {
        // 2018-11-02 01:25:34.796 UTC, a Friday
        let parts = TimeParts::from_epoch_millis(1541121934796).unwrap();

        assert_eq!(
            parts,
            TimeParts { hour: 1, day: 2, week: 44, month: 11, year: 2018, weekday: 5 }
        );
    }

    #[test]
    fn test_epoch_start() {
        // 1970-01-01 was a Thursday in ISO week 1
        let parts = TimeParts::from_epoch_millis(0).unwrap();

        assert_eq!(
            parts,
            TimeParts { hour: 0, day: 1, week: 1, month: 1, year: 1970, weekday: 4 }
        );
    }

    #[test]
    fn test_iso_week_crosses_year_boundary() {
        // 2018-12-31 23:59:59 UTC belongs to ISO week 1 of 2019 but calendar year 2018
        let parts = TimeParts::from_epoch_millis(1546300799000).unwrap();

        assert_eq!(parts.week, 1);
        assert_eq!(parts.year, 2018);
        assert_eq!(parts.month, 12);
        assert_eq!(parts.day, 31);
        assert_eq!(parts.hour, 23);
        assert_eq!(parts.weekday, 1);
    }

    #[test]
    fn test_sunday_is_zero() {
        // 2018-11-04 12:00:00 UTC, a Sunday
        let parts = TimeParts::from_epoch_millis(1541332800000).unwrap();

        assert_eq!(parts.weekday, 0);
        assert_eq!(parts.day, 4);
        assert_eq!(parts.hour, 12);
    }

    #[test]
    fn test_out_of_range() {
        assert!(TimeParts::from_epoch_millis(i64::MAX).is_none());
    }
}
