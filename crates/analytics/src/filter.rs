//! Range filter: reduces a snapshot to the records inside a requested window.
//!
//! A filter descriptor is either a named preset (`all`, `thisMonth`,
//! `lastMonth`, `thisYear`) or an explicit `{from, to}` pair of calendar
//! dates, inclusive on both ends on the *local* calendar. Resolution turns
//! the descriptor into concrete millisecond bounds once; filtering itself is
//! then a plain comparison per record.
//!
//! Records with a missing or unparsable `createdAt` are excluded from any
//! bounded window and never abort the pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use subsight_core::time::{month_start, prev_month_start, year_start};
use subsight_core::{Calendar, LedgerError, LedgerResult, Sale};

/// Named window presets plus the explicit-range escape hatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeMode {
    All,
    ThisMonth,
    LastMonth,
    ThisYear,
    Custom,
}

/// Filter descriptor as supplied by the caller.
///
/// When `mode` is omitted on the wire, the explicit inclusive `{from, to}`
/// pair is used directly (`Custom`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeFilter {
    #[serde(default = "default_mode")]
    pub mode: RangeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

fn default_mode() -> RangeMode {
    RangeMode::Custom
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl RangeFilter {
    pub fn all() -> Self {
        Self {
            mode: RangeMode::All,
            from: None,
            to: None,
        }
    }

    pub fn preset(mode: RangeMode) -> Self {
        Self {
            mode,
            from: None,
            to: None,
        }
    }

    /// Explicit inclusive calendar-date range.
    pub fn custom(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            mode: RangeMode::Custom,
            from: Some(from),
            to: Some(to),
        }
    }

    /// Turn the descriptor into concrete millisecond bounds against `now`.
    ///
    /// Preset rules:
    /// - `thisMonth`: `createdAt >= first day of the current month`
    /// - `lastMonth`: first day of last month `<= createdAt <` first day of
    ///   the current month
    /// - `thisYear`: `createdAt >=` January 1st of the current year
    /// - explicit: `from` at local midnight, `to` end-of-day (the exclusive
    ///   upper bound is midnight of the day after, so `from == to` captures
    ///   the full 24 hours of that day)
    pub fn resolve(&self, calendar: &Calendar, now_millis: i64) -> LedgerResult<ResolvedRange> {
        let today = calendar
            .today(now_millis)
            .ok_or_else(|| LedgerError::validation("current time outside calendar range"))?;

        match self.mode {
            RangeMode::All => Ok(ResolvedRange {
                start_millis: None,
                end_millis: None,
                window: None,
            }),
            RangeMode::ThisMonth => {
                let from = month_start(today);
                Ok(ResolvedRange {
                    start_millis: Some(calendar.start_of_day_millis(from)),
                    end_millis: None,
                    window: Some((from, today)),
                })
            }
            RangeMode::LastMonth => {
                let end = month_start(today);
                let from = prev_month_start(today);
                Ok(ResolvedRange {
                    start_millis: Some(calendar.start_of_day_millis(from)),
                    end_millis: Some(calendar.start_of_day_millis(end)),
                    window: Some((from, end.pred_opt().unwrap_or(from))),
                })
            }
            RangeMode::ThisYear => {
                let from = year_start(today);
                Ok(ResolvedRange {
                    start_millis: Some(calendar.start_of_day_millis(from)),
                    end_millis: None,
                    window: Some((from, today)),
                })
            }
            RangeMode::Custom => {
                let (Some(from), Some(to)) = (self.from, self.to) else {
                    return Err(LedgerError::invalid_range(
                        "custom range requires both from and to",
                    ));
                };
                if from > to {
                    return Err(LedgerError::invalid_range(format!(
                        "from {from} is after to {to}"
                    )));
                }
                Ok(ResolvedRange {
                    start_millis: Some(calendar.start_of_day_millis(from)),
                    end_millis: Some(calendar.end_of_day_exclusive_millis(to)),
                    window: Some((from, to)),
                })
            }
        }
    }
}

/// A filter descriptor resolved to concrete bounds.
///
/// `start_millis` is inclusive, `end_millis` exclusive. `window` is the
/// calendar-day span handed to the time bucketer; `None` for the unbounded
/// `all` mode, where the window is derived from the data instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedRange {
    start_millis: Option<i64>,
    end_millis: Option<i64>,
    window: Option<(NaiveDate, NaiveDate)>,
}

impl ResolvedRange {
    /// No bounds at all: every record passes, even timestampless ones.
    pub fn unbounded() -> Self {
        Self {
            start_millis: None,
            end_millis: None,
            window: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start_millis.is_none() && self.end_millis.is_none()
    }

    /// Calendar-day bucket window, when the descriptor implies one.
    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.window
    }

    /// Whether a record timestamp falls inside the range.
    ///
    /// A missing timestamp passes only the unbounded range; any bounded
    /// window excludes it.
    pub fn contains(&self, created_at: Option<i64>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(ts) = created_at else {
            return false;
        };
        if let Some(start) = self.start_millis {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end_millis {
            if ts >= end {
                return false;
            }
        }
        true
    }
}

/// Subset of `sales` whose `createdAt` falls inside `range`.
pub fn filter_sales(sales: &[Sale], range: &ResolvedRange) -> Vec<Sale> {
    sales
        .iter()
        .filter(|sale| range.contains(sale.created_at))
        .cloned()
        .collect()
}

/// History-screen variant: plain string comparison against preformatted
/// `YYYY-MM-DD` day keys, inclusive on both ends.
///
/// Day keys are derived through the same [`Calendar`] primitive as the
/// timestamp path above, so the two call sites cannot drift apart.
pub fn filter_by_day_key(
    sales: &[Sale],
    from_key: &str,
    to_key: &str,
    calendar: &Calendar,
) -> Vec<Sale> {
    sales
        .iter()
        .filter(|sale| {
            match sale.created_at.and_then(|ts| calendar.day_key(ts)) {
                Some(key) => from_key <= key.as_str() && key.as_str() <= to_key,
                None => false,
            }
        })
        .cloned()
        .collect()
}
