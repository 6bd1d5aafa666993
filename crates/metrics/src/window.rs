//! Reporting windows (today, yesterday, week, month) in store-local time.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Days of sales history used for slow-mover detection.
pub const LOOKBACK_DAYS: i64 = 30;

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Calendar boundaries for one evaluation instant.
///
/// Day, week (Monday based) and month boundaries are taken at local midnight
/// in the store's UTC offset, then carried as UTC instants.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
    pub today_start: DateTime<Utc>,
    pub tomorrow_start: DateTime<Utc>,
    pub yesterday_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
    pub prev_month_start: DateTime<Utc>,
    pub lookback_start: DateTime<Utc>,
}

impl ReportWindow {
    pub fn at(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        let week = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let month = today.with_day(1).unwrap_or(today);
        let prev_month = if month.month() == 1 {
            NaiveDate::from_ymd_opt(month.year() - 1, 12, 1)
        } else {
            NaiveDate::from_ymd_opt(month.year(), month.month() - 1, 1)
        }
        .unwrap_or(month);

        let midnight = |date: NaiveDate| local_midnight(date, offset);

        Self {
            now,
            offset,
            today_start: midnight(today),
            tomorrow_start: midnight(today + Duration::days(1)),
            yesterday_start: midnight(today - Duration::days(1)),
            week_start: midnight(week),
            month_start: midnight(month),
            prev_month_start: midnight(prev_month),
            lookback_start: midnight(today - Duration::days(LOOKBACK_DAYS)),
        }
    }

    pub fn today(&self) -> TimeRange {
        TimeRange::new(self.today_start, self.tomorrow_start)
    }

    pub fn yesterday(&self) -> TimeRange {
        TimeRange::new(self.yesterday_start, self.today_start)
    }

    pub fn week_to_date(&self) -> TimeRange {
        TimeRange::new(self.week_start, self.tomorrow_start)
    }

    pub fn month_to_date(&self) -> TimeRange {
        TimeRange::new(self.month_start, self.tomorrow_start)
    }

    pub fn previous_month(&self) -> TimeRange {
        TimeRange::new(self.prev_month_start, self.month_start)
    }

    pub fn lookback(&self) -> TimeRange {
        TimeRange::new(self.lookback_start, self.tomorrow_start)
    }

    /// Smallest range covering every window above; what the fetch layer asks for.
    pub fn fetch_range(&self) -> TimeRange {
        let start = [
            self.yesterday_start,
            self.week_start,
            self.month_start,
            self.lookback_start,
        ]
        .into_iter()
        .min()
        .unwrap_or(self.today_start);
        TimeRange::new(start, self.tomorrow_start)
    }

    /// Hour of day (0..=23) in store-local time.
    pub fn local_hour(&self) -> u32 {
        self.now.with_timezone(&self.offset).hour()
    }

    /// Local hour of an arbitrary instant.
    pub fn hour_of(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&self.offset).hour()
    }

    /// Hours elapsed since local midnight (fractional).
    pub fn elapsed_hours_today(&self) -> f64 {
        (self.now - self.today_start).num_seconds().max(0) as f64 / 3600.0
    }
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::MIN);
    (local - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn boundaries_in_utc() {
        // Thursday.
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 0).unwrap();
        let w = ReportWindow::at(now, FixedOffset::east_opt(0).unwrap());

        assert_eq!(w.today_start, Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(w.yesterday_start, Utc.with_ymd_and_hms(2026, 1, 14, 0, 0, 0).unwrap());
        assert_eq!(w.week_start, Utc.with_ymd_and_hms(2026, 1, 12, 0, 0, 0).unwrap());
        assert_eq!(w.month_start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(w.prev_month_start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(w.local_hour(), 14);
        assert_eq!(w.elapsed_hours_today(), 14.5);
    }

    #[test]
    fn local_offset_moves_the_day() {
        // 23:00 UTC is already the next day at UTC+2.
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 23, 0, 0).unwrap();
        let w = ReportWindow::at(now, FixedOffset::east_opt(2 * 3600).unwrap());

        assert_eq!(w.today_start, Utc.with_ymd_and_hms(2026, 3, 31, 22, 0, 0).unwrap());
        assert_eq!(w.month_start, Utc.with_ymd_and_hms(2026, 3, 31, 22, 0, 0).unwrap());
        assert_eq!(w.local_hour(), 1);
    }

    #[test]
    fn ranges_are_half_open() {
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap();
        let w = ReportWindow::at(now, FixedOffset::east_opt(0).unwrap());

        assert!(w.today().contains(w.today_start));
        assert!(!w.today().contains(w.tomorrow_start));
        assert!(!w.yesterday().contains(w.today_start));
        assert_eq!(w.fetch_range().start, w.lookback_start.min(w.month_start));
    }
}
