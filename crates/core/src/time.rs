//! Local-calendar primitive.
//!
//! Dashboard ranges and time buckets work on *local* calendar days, not UTC.
//! [`Calendar`] captures the local offset once and is the single place where
//! an epoch-millisecond timestamp becomes a calendar day, a `YYYY-MM-DD` day
//! key, or an `HH:00` hour key. The two range-filter call sites (timestamp
//! comparison on the dashboard, day-key string comparison in history) both
//! derive their days here, so they can never drift apart.
//!
//! A fixed offset is deliberate: it keeps every derivation a pure function of
//! its inputs, which the tests rely on. DST shifts inside one dashboard
//! window are approximated by the offset captured at construction.

use chrono::{Datelike, DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc};

use crate::error::{LedgerError, LedgerResult};

/// Milliseconds in one calendar day under a fixed offset.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Fixed-offset local calendar; the shared day/hour derivation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    /// Calendar pinned to the system-local offset at the time of the call.
    pub fn system() -> Self {
        Self {
            offset: *Local::now().offset(),
        }
    }

    /// UTC calendar; handy default for tests and servers pinned to UTC.
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn fixed(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar at `seconds` east of UTC.
    pub fn east_seconds(seconds: i32) -> LedgerResult<Self> {
        FixedOffset::east_opt(seconds)
            .map(Self::fixed)
            .ok_or_else(|| LedgerError::validation(format!("offset out of range: {seconds}s")))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local wall-clock datetime for an epoch-millisecond timestamp.
    ///
    /// `None` when the timestamp is outside chrono's representable range.
    pub fn datetime(&self, ts_millis: i64) -> Option<DateTime<FixedOffset>> {
        Utc.timestamp_millis_opt(ts_millis)
            .single()
            .map(|dt| dt.with_timezone(&self.offset))
    }

    /// Local calendar day of a timestamp.
    pub fn day(&self, ts_millis: i64) -> Option<NaiveDate> {
        self.datetime(ts_millis).map(|dt| dt.date_naive())
    }

    /// Canonical `YYYY-MM-DD` day key (sorts lexicographically == chronologically).
    pub fn day_key(&self, ts_millis: i64) -> Option<String> {
        self.day(ts_millis).map(|d| format_day_key(d))
    }

    /// `HH:00` local hour-of-day key for single-day bucketing.
    pub fn hour_key(&self, ts_millis: i64) -> Option<String> {
        self.datetime(ts_millis)
            .map(|dt| format!("{:02}:00", dt.hour()))
    }

    /// Local calendar day of "now".
    pub fn today(&self, now_millis: i64) -> Option<NaiveDate> {
        self.day(now_millis)
    }

    /// Epoch milliseconds of local midnight starting `day`.
    pub fn start_of_day_millis(&self, day: NaiveDate) -> i64 {
        let midnight = day.and_time(NaiveTime::MIN);
        midnight.and_utc().timestamp_millis() - i64::from(self.offset.local_minus_utc()) * 1000
    }

    /// Exclusive upper bound for an inclusive end day: local midnight of the
    /// day after, so a `from == to` range covers the full 24 hours.
    pub fn end_of_day_exclusive_millis(&self, day: NaiveDate) -> i64 {
        self.start_of_day_millis(day) + MILLIS_PER_DAY
    }
}

/// Canonical sortable day key.
pub fn format_day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// First day of `day`'s month.
pub fn month_start(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day)
}

/// First day of the month before `day`'s month.
pub fn prev_month_start(day: NaiveDate) -> NaiveDate {
    let (year, month) = if day.month() == 1 {
        (day.year() - 1, 12)
    } else {
        (day.year(), day.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(day)
}

/// January 1st of `day`'s year.
pub fn year_start(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day)
}
