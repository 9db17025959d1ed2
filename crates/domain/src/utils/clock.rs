//! Timezone anchoring and granularity helpers
//!
//! The pipeline stores event times as naive wall-clock values paired with an
//! IANA timezone. These helpers interpret a naive value in its timezone,
//! re-render instants in another timezone, and snap times to slot boundaries.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::errors::{Result, TesseraError};

/// Interpret a naive wall-clock value in the given timezone.
///
/// Ambiguous local times (DST fold) resolve to the earlier instant; times
/// that do not exist (DST gap) are an input error.
pub fn anchor_in_tz(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        TesseraError::InvalidInput(format!("local time {naive} does not exist in {tz}"))
    })
}

/// Re-render an instant as wall-clock time in another timezone.
pub fn render_in(instant: DateTime<Tz>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// ISO weekday (1 = Monday .. 7 = Sunday) of a date or timestamp.
pub fn iso_weekday(value: impl Datelike) -> u8 {
    value.weekday().number_from_monday() as u8
}

/// Snap a timestamp down to the previous granularity boundary
/// (0/15/30/45 for fine slots, 0/30 for lite), dropping seconds.
pub fn floor_to_granularity(naive: NaiveDateTime, granularity_minutes: i64) -> NaiveDateTime {
    let minute = i64::from(naive.minute());
    let floored = minute - minute % granularity_minutes;
    naive
        .date()
        .and_hms_opt(naive.hour(), floored as u32, 0)
        .unwrap_or_else(|| naive.date().and_hms_opt(naive.hour(), 0, 0).unwrap_or(naive))
}

/// Snap a timestamp up to the next granularity boundary, dropping seconds.
/// Timestamps already on a boundary are returned unchanged.
pub fn ceil_to_granularity(naive: NaiveDateTime, granularity_minutes: i64) -> NaiveDateTime {
    let floored = floor_to_granularity(naive, granularity_minutes);
    if floored == naive {
        floored
    } else {
        floored + Duration::minutes(granularity_minutes)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use chrono_tz::America::{Chicago, New_York};

    use super::*;

    fn naive(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn anchors_and_rerenders_across_timezones() {
        let anchored = anchor_in_tz(naive(9, 0), New_York).unwrap();
        let in_chicago = render_in(anchored, Chicago);
        assert_eq!(in_chicago, naive(8, 0));
    }

    #[test]
    fn floors_to_fine_boundaries() {
        assert_eq!(floor_to_granularity(naive(9, 0), 15), naive(9, 0));
        assert_eq!(floor_to_granularity(naive(9, 14), 15), naive(9, 0));
        assert_eq!(floor_to_granularity(naive(9, 29), 15), naive(9, 15));
        assert_eq!(floor_to_granularity(naive(9, 47), 15), naive(9, 45));
    }

    #[test]
    fn floors_to_lite_boundaries() {
        assert_eq!(floor_to_granularity(naive(9, 29), 30), naive(9, 0));
        assert_eq!(floor_to_granularity(naive(9, 31), 30), naive(9, 30));
    }

    #[test]
    fn ceils_to_boundaries() {
        assert_eq!(ceil_to_granularity(naive(9, 0), 15), naive(9, 0));
        assert_eq!(ceil_to_granularity(naive(9, 1), 15), naive(9, 15));
        assert_eq!(ceil_to_granularity(naive(9, 46), 15), naive(10, 0));
    }

    #[test]
    fn iso_weekday_is_monday_based() {
        // 2023-06-05 is a Monday
        assert_eq!(iso_weekday(naive(9, 0)), 1);
    }
}
