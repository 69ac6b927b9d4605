use crate::error::{ApiError, ApiResult};
use chrono::NaiveTime;

/// A start/end time-of-day pair recorded against one attendance entry.
///
/// Both times carry no date; when the end does not fall strictly after the
/// start it is taken to be on the next calendar day, so an overnight window
/// like 23:00-01:00 spans two hours and an equal pair counts as a full
/// 24-hour shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvertimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OvertimeWindow {
    pub fn parse(start: &str, end: &str) -> ApiResult<Self> {
        Ok(Self {
            start: parse_time_of_day(start)?,
            end: parse_time_of_day(end)?,
        })
    }

    /// Elapsed hours from start to end, rounded half-up to 2 decimals.
    pub fn hours(&self) -> f64 {
        let mut seconds = self
            .end
            .signed_duration_since(self.start)
            .num_seconds();
        if seconds <= 0 {
            seconds += 24 * 3600;
        }
        round2(seconds as f64 / 3600.0)
    }
}

/// Accepts "HH:MM" and "HH:MM:SS".
pub fn parse_time_of_day(value: &str) -> ApiResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ApiError::InvalidTimeRange(format!("Invalid time of day: {value:?}")))
}

/// Convenience wrapper for callers that only need the derived hours.
pub fn overtime_hours(start: &str, end: &str) -> ApiResult<f64> {
    Ok(OvertimeWindow::parse(start, end)?.hours())
}

pub fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_day_window() {
        assert_eq!(overtime_hours("09:00", "17:30").unwrap(), 8.5);
    }

    #[test]
    fn overnight_rollover() {
        assert_eq!(overtime_hours("23:00", "01:00").unwrap(), 2.0);
    }

    #[test]
    fn equal_start_and_end_is_a_full_day() {
        assert_eq!(overtime_hours("08:00", "08:00").unwrap(), 24.0);
    }

    #[test]
    fn sub_hour_window_rounds_to_two_decimals() {
        // 20 minutes = 0.3333... hours
        assert_eq!(overtime_hours("10:00", "10:20").unwrap(), 0.33);
        // 40 minutes rounds up
        assert_eq!(overtime_hours("10:00", "10:40").unwrap(), 0.67);
    }

    #[test]
    fn seconds_are_honoured_when_present() {
        assert_eq!(overtime_hours("10:00:00", "11:30:00").unwrap(), 1.5);
    }

    #[test]
    fn malformed_times_are_rejected() {
        assert!(matches!(
            overtime_hours("25:00", "26:00"),
            Err(ApiError::InvalidTimeRange(_))
        ));
        assert!(matches!(
            overtime_hours("not-a-time", "17:00"),
            Err(ApiError::InvalidTimeRange(_))
        ));
        assert!(matches!(
            overtime_hours("17:00", ""),
            Err(ApiError::InvalidTimeRange(_))
        ));
    }

    #[test]
    fn hours_are_never_negative() {
        // end before start means next-day end, not a negative duration
        assert_eq!(overtime_hours("18:00", "06:00").unwrap(), 12.0);
    }
}
