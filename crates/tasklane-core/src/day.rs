//! Calendar-day boundaries in a given time zone.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};

/// Inclusive instant range covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    /// The local calendar day.
    pub date: Date,
    /// First instant of the day (00:00:00.000 local, or the first instant after a gap).
    pub start: Timestamp,
    /// Last millisecond of the day (23:59:59.999 local).
    pub end: Timestamp,
}

/// Compute the local-day bounds of `instant` in `tz`.
///
/// The end is derived from the next day's start, so 23- and 25-hour days
/// produce spans other than 24 hours.
///
/// # Errors
/// Returns an error when the day lies at the edge of the supported range.
pub fn day_bounds(instant: Timestamp, tz: &TimeZone) -> Result<DayBounds, jiff::Error> {
    let date = instant.to_zoned(tz.clone()).date();
    let start = date.to_zoned(tz.clone())?.timestamp();
    let next_start = date.tomorrow()?.to_zoned(tz.clone())?.timestamp();
    let end = next_start.checked_sub(SignedDuration::from_millis(1))?;
    Ok(DayBounds { date, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    const HOUR_MS: i64 = 60 * 60 * 1000;

    fn zone(name: &str) -> TimeZone {
        TimeZone::get(name).unwrap_or_else(|err| panic!("zone {name}: {err}"))
    }

    fn ts(raw: &str) -> Timestamp {
        raw.parse().unwrap_or_else(|err| panic!("timestamp {raw}: {err}"))
    }

    fn bounds(raw: &str, tz: &TimeZone) -> DayBounds {
        day_bounds(ts(raw), tz).unwrap_or_else(|err| panic!("bounds for {raw}: {err}"))
    }

    fn span_ms(bounds: &DayBounds) -> i64 {
        bounds.end.as_millisecond() - bounds.start.as_millisecond() + 1
    }

    #[test]
    fn utc_day_spans_midnight_to_last_millisecond() {
        let b = bounds("2025-06-15T13:45:10Z", &TimeZone::UTC);
        assert_eq!(b.date, date(2025, 6, 15));
        assert_eq!(b.start, ts("2025-06-15T00:00:00Z"));
        assert_eq!(b.end, ts("2025-06-15T23:59:59.999Z"));
        assert_eq!(span_ms(&b), 24 * HOUR_MS);
    }

    #[test]
    fn local_date_is_taken_from_the_zone_not_utc() {
        // 03:00Z is still the previous evening in New York.
        let tz = zone("America/New_York");
        let b = bounds("2025-06-15T03:00:00Z", &tz);
        assert_eq!(b.date, date(2025, 6, 14));
        assert_eq!(b.start, ts("2025-06-14T04:00:00Z"));
        assert_eq!(b.end, ts("2025-06-15T03:59:59.999Z"));
    }

    #[test]
    fn spring_forward_day_is_23_hours() {
        let tz = zone("America/New_York");
        let b = bounds("2024-03-10T15:00:00Z", &tz);
        assert_eq!(b.date, date(2024, 3, 10));
        assert_eq!(b.start, ts("2024-03-10T05:00:00Z"));
        assert_eq!(b.end, ts("2024-03-11T03:59:59.999Z"));
        assert_eq!(span_ms(&b), 23 * HOUR_MS);
        assert_eq!(b.start.to_zoned(tz.clone()).date(), b.date);
        assert_eq!(b.end.to_zoned(tz).date(), b.date);
    }

    #[test]
    fn fall_back_day_is_25_hours() {
        let tz = zone("America/New_York");
        let b = bounds("2024-11-03T12:00:00Z", &tz);
        assert_eq!(b.start, ts("2024-11-03T04:00:00Z"));
        assert_eq!(b.end, ts("2024-11-04T04:59:59.999Z"));
        assert_eq!(span_ms(&b), 25 * HOUR_MS);
        assert_eq!(b.end.to_zoned(tz).date(), date(2024, 11, 3));
    }

    #[test]
    fn missing_midnight_starts_at_first_valid_instant() {
        // São Paulo skipped 00:00-01:00 on 2018-11-04.
        let tz = zone("America/Sao_Paulo");
        let b = bounds("2018-11-04T15:00:00Z", &tz);
        assert_eq!(b.start, ts("2018-11-04T03:00:00Z"));
        assert_eq!(b.start.to_zoned(tz).date(), date(2018, 11, 4));
        assert_eq!(span_ms(&b), 23 * HOUR_MS);
    }
}
