//! Date-range filtering for booking lists

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// An inclusive date range over booking start times.
///
/// Bounds are whole days: `from` starts at midnight, `to` is extended
/// to the end of its day. An absent bound defaults to an effectively
/// unbounded edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let from = from
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or(DateTime::UNIX_EPOCH);
        let to = to
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { from, to }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_bounded_range_is_inclusive() {
        let range = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 20)));

        assert!(range.contains(at(2024, 1, 15, 9)));
        assert!(!range.contains(at(2024, 2, 1, 0)));
    }

    #[test]
    fn test_to_bound_extends_to_end_of_day() {
        let range = DateRange::new(Some(date(2024, 1, 10)), Some(date(2024, 1, 20)));

        assert!(range.contains(at(2024, 1, 20, 23)));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 20, 23, 59, 59).unwrap()));
        assert!(!range.contains(at(2024, 1, 21, 0)));
    }

    #[test]
    fn test_from_bound_starts_at_midnight() {
        let range = DateRange::new(Some(date(2024, 1, 10)), None);

        assert!(range.contains(at(2024, 1, 10, 0)));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap()));
    }

    #[test]
    fn test_absent_bounds_are_effectively_unbounded() {
        let range = DateRange::new(None, None);

        assert!(range.contains(at(1971, 1, 1, 0)));
        assert!(range.contains(at(2099, 12, 31, 23)));
    }

    #[test]
    fn test_to_only_range() {
        let range = DateRange::new(None, Some(date(2024, 6, 30)));

        assert!(range.contains(at(2020, 1, 1, 0)));
        assert!(!range.contains(at(2024, 7, 1, 0)));
    }
}
