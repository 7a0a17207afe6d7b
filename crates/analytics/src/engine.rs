//! The recomputation engine: snapshot + filter in, dashboard view out.
//!
//! Every invocation is a fresh, pure recomputation over the full filtered
//! set; no accumulator survives between calls. The only state is a single
//! memo slot keyed on (snapshot identity, resolved range), replaced wholesale
//! on every recompute, so asking twice for the same view returns the same
//! `Arc` without touching the ledger again.

use std::sync::Arc;

use tracing::debug;

use subsight_core::{Calendar, LedgerError, LedgerResult, LedgerSnapshot, Sale, SnapshotId};

use crate::export::{ColumnPrefs, ExportBatch, enabled_columns};
use crate::filter::{RangeFilter, ResolvedRange, filter_sales};
use crate::views::{DashboardView, assemble_dashboard};

struct Memo {
    snapshot: SnapshotId,
    range: ResolvedRange,
    filtered: Arc<Vec<Sale>>,
    view: Arc<DashboardView>,
}

/// Stateless-by-contract analytics engine with a one-slot memo.
pub struct AnalyticsEngine {
    calendar: Calendar,
    memo: Option<Memo>,
}

impl AnalyticsEngine {
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            memo: None,
        }
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// The full dashboard view for `snapshot` under `filter`, memoized on
    /// (snapshot identity, resolved range).
    pub fn dashboard(
        &mut self,
        snapshot: &LedgerSnapshot,
        filter: &RangeFilter,
        now_millis: i64,
    ) -> LedgerResult<Arc<DashboardView>> {
        self.recompute(snapshot, filter, now_millis)
            .map(|memo| memo.view.clone())
    }

    /// The currently filtered record subset, for handing to an external
    /// tabular exporter. Shares the memo with [`Self::dashboard`].
    pub fn filtered_records(
        &mut self,
        snapshot: &LedgerSnapshot,
        filter: &RangeFilter,
        now_millis: i64,
    ) -> LedgerResult<Arc<Vec<Sale>>> {
        self.recompute(snapshot, filter, now_millis)
            .map(|memo| memo.filtered.clone())
    }

    /// Pair the filtered subset with a caller-supplied column preference map.
    /// The engine does not define the export column schema.
    pub fn export(
        &mut self,
        snapshot: &LedgerSnapshot,
        filter: &RangeFilter,
        now_millis: i64,
        columns: &ColumnPrefs,
    ) -> LedgerResult<ExportBatch> {
        let records = self.filtered_records(snapshot, filter, now_millis)?;
        Ok(ExportBatch {
            columns: enabled_columns(columns),
            records,
        })
    }

    fn recompute(
        &mut self,
        snapshot: &LedgerSnapshot,
        filter: &RangeFilter,
        now_millis: i64,
    ) -> LedgerResult<&Memo> {
        let range = filter.resolve(&self.calendar, now_millis)?;

        let hit = self
            .memo
            .as_ref()
            .is_some_and(|m| m.snapshot == snapshot.id() && m.range == range);
        if !hit {
            let filtered = filter_sales(snapshot.sales(), &range);
            let window = self.bucket_window(&range, &filtered, now_millis)?;
            let view = assemble_dashboard(snapshot.sales(), &filtered, window, &self.calendar);
            debug!(
                snapshot = %snapshot.id(),
                total = snapshot.len(),
                filtered = filtered.len(),
                "recomputed dashboard view"
            );
            self.memo = Some(Memo {
                snapshot: snapshot.id(),
                range,
                filtered: Arc::new(filtered),
                view: Arc::new(view),
            });
        } else {
            debug!(snapshot = %snapshot.id(), "dashboard memo hit");
        }

        // The slot was just checked or just filled.
        self.memo
            .as_ref()
            .ok_or_else(|| LedgerError::validation("memo slot unexpectedly empty"))
    }

    /// The `[from, to]` span handed to the bucketer. Bounded descriptors
    /// carry their own window; the unbounded `all` mode derives one from the
    /// data (earliest record day through today).
    ///
    /// Open-ended presets cap the window at today even though their filter
    /// has no upper bound, so a record stamped after `now` counts in the
    /// aggregates but not in the trend series. Creation stamps do not run
    /// ahead of the clock, which keeps that gap theoretical.
    fn bucket_window(
        &self,
        range: &ResolvedRange,
        filtered: &[Sale],
        now_millis: i64,
    ) -> LedgerResult<(chrono::NaiveDate, chrono::NaiveDate)> {
        if let Some(window) = range.window() {
            return Ok(window);
        }
        let today = self
            .calendar
            .today(now_millis)
            .ok_or_else(|| LedgerError::validation("current time outside calendar range"))?;
        let earliest = filtered
            .iter()
            .filter_map(|s| s.created_at)
            .min()
            .and_then(|ts| self.calendar.day(ts))
            .unwrap_or(today);
        Ok((earliest.min(today), today))
    }
}
