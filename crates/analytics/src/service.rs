//! Reactive wiring: ledger snapshots in, dashboard views out.
//!
//! The service subscribes to the snapshot feed, keeps the caller's current
//! range filter, and republishes a freshly assembled [`DashboardView`] after
//! every ledger change or filter change. Consumers never see partial state;
//! each published view is a complete replacement.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use subsight_core::{Calendar, LedgerResult, LedgerSnapshot};
use subsight_feed::{FeedBus, Subscription};

use crate::engine::AnalyticsEngine;
use crate::filter::RangeFilter;
use crate::views::DashboardView;

/// Pull-driven analytics loop over a snapshot subscription.
///
/// `pump` is meant to be called from the host's event loop (or a dedicated
/// thread); it is cheap when nothing changed thanks to the engine memo.
pub struct AnalyticsService<P> {
    engine: AnalyticsEngine,
    filter: RangeFilter,
    snapshots: Subscription<LedgerSnapshot>,
    current: Option<LedgerSnapshot>,
    views: P,
}

impl<P> AnalyticsService<P>
where
    P: FeedBus<Arc<DashboardView>>,
{
    pub fn new(calendar: Calendar, snapshots: Subscription<LedgerSnapshot>, views: P) -> Self {
        Self {
            engine: AnalyticsEngine::new(calendar),
            filter: RangeFilter::all(),
            snapshots,
            current: None,
            views,
        }
    }

    pub fn filter(&self) -> &RangeFilter {
        &self.filter
    }

    /// Replace the active filter and, when a snapshot is held, republish
    /// immediately under the new window.
    pub fn set_filter(&mut self, filter: RangeFilter) -> LedgerResult<()> {
        self.set_filter_at(filter, Utc::now().timestamp_millis())
    }

    /// Drain the snapshot feed and republish if a newer ledger arrived.
    /// Returns whether a view was published.
    pub fn pump(&mut self) -> LedgerResult<bool> {
        self.pump_at(Utc::now().timestamp_millis())
    }

    /// Clock-injected variant of [`Self::set_filter`].
    pub fn set_filter_at(&mut self, filter: RangeFilter, now_millis: i64) -> LedgerResult<()> {
        if self.filter != filter {
            debug!(?filter, "range filter changed");
            self.filter = filter;
            self.refresh(now_millis)?;
        }
        Ok(())
    }

    /// Clock-injected variant of [`Self::pump`].
    pub fn pump_at(&mut self, now_millis: i64) -> LedgerResult<bool> {
        // Intermediate snapshots are full replacements; only the newest matters.
        let Some(snapshot) = self.snapshots.latest() else {
            return Ok(false);
        };
        debug!(snapshot = %snapshot.id(), records = snapshot.len(), "ledger snapshot received");
        self.current = Some(snapshot);
        self.refresh(now_millis)?;
        Ok(true)
    }

    fn refresh(&mut self, now_millis: i64) -> LedgerResult<()> {
        let Some(snapshot) = self.current.as_ref() else {
            return Ok(());
        };
        let view = self.engine.dashboard(snapshot, &self.filter, now_millis)?;
        // A publish failure means no live consumers; the next pump retries.
        if let Err(error) = self.views.publish(view) {
            warn!(?error, "dashboard view publish failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use subsight_core::{ClientInfo, Finance, Sale, SaleId};
    use subsight_feed::InMemoryFeed;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(ts: i64, sell: f64) -> Sale {
        Sale {
            id: SaleId::new(),
            created_at: Some(ts),
            client: ClientInfo {
                name: "Alice".to_string(),
                phone: "123".to_string(),
                ..ClientInfo::default()
            },
            vendor: Default::default(),
            items: Vec::new(),
            finance: Finance {
                total_sell: sell,
                ..Finance::default()
            },
            instructions: String::new(),
        }
    }

    fn harness() -> (
        InMemoryFeed<LedgerSnapshot>,
        AnalyticsService<Arc<InMemoryFeed<Arc<DashboardView>>>>,
        Subscription<Arc<DashboardView>>,
        i64,
    ) {
        let cal = Calendar::utc();
        let now = cal.start_of_day_millis(date(2024, 3, 15)) + 9 * 3_600_000;
        let ledger_feed: InMemoryFeed<LedgerSnapshot> = InMemoryFeed::new();
        let view_feed: Arc<InMemoryFeed<Arc<DashboardView>>> = Arc::new(InMemoryFeed::new());
        let views = view_feed.subscribe();
        let service = AnalyticsService::new(cal, ledger_feed.subscribe(), view_feed);
        (ledger_feed, service, views, now)
    }

    #[test]
    fn snapshot_pump_publishes_a_view() {
        let (ledger, mut service, views, now) = harness();

        ledger
            .publish(LedgerSnapshot::new(vec![sale(now - 1_000, 50.0)]))
            .unwrap();

        assert!(service.pump_at(now).unwrap());
        let view = views.try_recv().unwrap();
        assert_eq!(view.totals.revenue, 50.0);
        assert_eq!(view.totals.sales_count, 1);
    }

    #[test]
    fn empty_feed_pumps_nothing() {
        let (_ledger, mut service, views, now) = harness();
        assert!(!service.pump_at(now).unwrap());
        assert!(views.try_recv().is_err());
    }

    #[test]
    fn only_the_newest_queued_snapshot_is_computed() {
        let (ledger, mut service, views, now) = harness();

        ledger.publish(LedgerSnapshot::new(Vec::new())).unwrap();
        ledger
            .publish(LedgerSnapshot::new(vec![sale(now - 1_000, 10.0)]))
            .unwrap();

        assert!(service.pump_at(now).unwrap());
        let view = views.latest().unwrap();
        assert_eq!(view.totals.sales_count, 1);
        // Both queued snapshots collapsed into one publish.
        assert!(views.try_recv().is_err());
    }

    #[test]
    fn filter_change_republishes_under_the_new_window() {
        let (ledger, mut service, views, now) = harness();
        let cal = Calendar::utc();

        let in_march = sale(now - 1_000, 30.0);
        let in_january = sale(cal.start_of_day_millis(date(2024, 1, 10)), 70.0);
        ledger
            .publish(LedgerSnapshot::new(vec![in_march, in_january]))
            .unwrap();
        service.pump_at(now).unwrap();
        assert_eq!(views.latest().unwrap().totals.revenue, 100.0);

        service
            .set_filter_at(RangeFilter::custom(date(2024, 3, 1), date(2024, 3, 31)), now)
            .unwrap();
        assert_eq!(views.latest().unwrap().totals.revenue, 30.0);
    }

    #[test]
    fn setting_the_same_filter_does_not_republish() {
        let (ledger, mut service, views, now) = harness();

        ledger
            .publish(LedgerSnapshot::new(vec![sale(now - 1_000, 5.0)]))
            .unwrap();
        service.pump_at(now).unwrap();
        let _ = views.latest();

        service.set_filter_at(RangeFilter::all(), now).unwrap();
        assert!(views.try_recv().is_err());
    }

    #[test]
    fn filter_set_before_any_snapshot_is_remembered() {
        let (ledger, mut service, views, now) = harness();

        service
            .set_filter_at(RangeFilter::custom(date(2024, 3, 1), date(2024, 3, 31)), now)
            .unwrap();
        assert!(views.try_recv().is_err());

        let cal = Calendar::utc();
        ledger
            .publish(LedgerSnapshot::new(vec![
                sale(now - 1_000, 30.0),
                sale(cal.start_of_day_millis(date(2024, 1, 10)), 70.0),
            ]))
            .unwrap();
        service.pump_at(now).unwrap();
        assert_eq!(views.latest().unwrap().totals.revenue, 30.0);
    }
}
