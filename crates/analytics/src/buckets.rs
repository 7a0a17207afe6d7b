//! Time bucketer: chronologically ordered revenue/cost/profit series.
//!
//! A single-day window (`from == to`) produces 24 hour-of-day buckets
//! `"00:00"… "23:00"`; anything wider produces one bucket per calendar day,
//! inclusive on both ends. Buckets are pre-populated with zero sums so the
//! series has no gaps on quiet days. A record whose computed key has no
//! pre-created bucket is dropped with a trace; pre-population matching the
//! filter window exactly is what keeps that path cold.
//!
//! Bucket keys are canonical sort keys (`HH:00` / `YYYY-MM-DD`, both of which
//! sort lexicographically == chronologically); display labels are derived
//! separately.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use subsight_core::time::format_day_key;
use subsight_core::{Calendar, Sale};

/// One hour-of-day or calendar-day slot of the trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    /// Canonical sort key: `HH:00` or `YYYY-MM-DD`.
    pub key: String,
    /// Display label for chart axes.
    pub label: String,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl TimeBucket {
    fn zeroed(key: String, label: String) -> Self {
        Self {
            key,
            label,
            revenue: 0.0,
            cost: 0.0,
            profit: 0.0,
        }
    }

    fn add(&mut self, sale: &Sale) {
        self.revenue += sale.finance.total_sell;
        self.cost += sale.finance.total_cost;
        self.profit += sale.finance.total_profit;
    }
}

/// Human-facing label for a day bucket, separate from its sort key.
fn day_label(day: NaiveDate) -> String {
    day.format("%d %b").to_string()
}

/// Bucket the (already filtered) record set over the `[from, to]` window.
pub fn bucket_sales(
    sales: &[Sale],
    from: NaiveDate,
    to: NaiveDate,
    calendar: &Calendar,
) -> Vec<TimeBucket> {
    if from > to {
        warn!(%from, %to, "degenerate bucket window, returning empty series");
        return Vec::new();
    }
    if from == to {
        bucket_hourly(sales, from, calendar)
    } else {
        bucket_daily(sales, from, to, calendar)
    }
}

fn bucket_hourly(sales: &[Sale], day: NaiveDate, calendar: &Calendar) -> Vec<TimeBucket> {
    let mut buckets: Vec<TimeBucket> = (0..24)
        .map(|hour| {
            let key = format!("{hour:02}:00");
            TimeBucket::zeroed(key.clone(), key)
        })
        .collect();

    for sale in sales {
        let key = sale.created_at.and_then(|ts| {
            // Guard against records outside the single day slipping through.
            match calendar.day(ts) {
                Some(d) if d == day => calendar.hour_key(ts),
                _ => None,
            }
        });
        match key.and_then(|k| buckets.iter_mut().find(|b| b.key == k)) {
            Some(bucket) => bucket.add(sale),
            None => debug!(sale_id = %sale.id, "record outside hourly window dropped"),
        }
    }

    buckets
}

fn bucket_daily(
    sales: &[Sale],
    from: NaiveDate,
    to: NaiveDate,
    calendar: &Calendar,
) -> Vec<TimeBucket> {
    let mut buckets: Vec<TimeBucket> = Vec::new();
    let mut day = from;
    while day <= to {
        buckets.push(TimeBucket::zeroed(format_day_key(day), day_label(day)));
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    for sale in sales {
        let key = sale.created_at.and_then(|ts| calendar.day_key(ts));
        match key.and_then(|k| {
            // Keys are pre-sorted; binary search keeps the pass cheap on wide windows.
            buckets
                .binary_search_by(|b| b.key.as_str().cmp(k.as_str()))
                .ok()
        }) {
            Some(slot) => buckets[slot].add(sale),
            None => debug!(sale_id = %sale.id, "record outside daily window dropped"),
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use subsight_core::time::MILLIS_PER_DAY;
    use subsight_core::{Finance, SaleId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale_at(ts: i64, sell: f64, cost: f64, profit: f64) -> Sale {
        Sale {
            id: SaleId::new(),
            created_at: Some(ts),
            client: Default::default(),
            vendor: Default::default(),
            items: Vec::new(),
            finance: Finance {
                total_sell: sell,
                total_cost: cost,
                total_profit: profit,
                pending_amount: 0.0,
            },
            instructions: String::new(),
        }
    }

    #[test]
    fn single_day_window_builds_24_hour_buckets() {
        let cal = Calendar::utc();
        let day = date(2024, 3, 10);
        let start = cal.start_of_day_millis(day);

        let sales = vec![
            sale_at(start + 9 * 3_600_000, 10.0, 4.0, 6.0),
            sale_at(start + 9 * 3_600_000 + 1, 5.0, 2.0, 3.0),
            sale_at(start + 23 * 3_600_000, 7.0, 3.0, 4.0),
        ];

        let buckets = bucket_sales(&sales, day, day, &cal);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[0].key, "00:00");
        assert_eq!(buckets[23].key, "23:00");
        assert_eq!(buckets[9].revenue, 15.0);
        assert_eq!(buckets[9].profit, 9.0);
        assert_eq!(buckets[23].revenue, 7.0);
        assert_eq!(buckets[10].revenue, 0.0);
    }

    #[test]
    fn multi_day_window_has_one_bucket_per_day_with_no_gaps() {
        let cal = Calendar::utc();
        let from = date(2024, 2, 27);
        let to = date(2024, 3, 2); // spans a leap-year February boundary

        let sales = vec![sale_at(
            cal.start_of_day_millis(date(2024, 2, 29)) + 1_000,
            42.0,
            20.0,
            22.0,
        )];

        let buckets = bucket_sales(&sales, from, to, &cal);
        assert_eq!(buckets.len(), 5);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]
        );
        assert_eq!(buckets[2].revenue, 42.0);
        assert_eq!(buckets[0].revenue, 0.0);
        // Labels are display-formatted, distinct from the sort key.
        assert_eq!(buckets[2].label, "29 Feb");
    }

    #[test]
    fn records_outside_the_window_are_dropped_silently() {
        let cal = Calendar::utc();
        let from = date(2024, 3, 1);
        let to = date(2024, 3, 3);

        let inside = sale_at(cal.start_of_day_millis(date(2024, 3, 2)), 10.0, 0.0, 0.0);
        let outside = sale_at(cal.start_of_day_millis(date(2024, 4, 1)), 99.0, 0.0, 0.0);
        let missing_ts = Sale {
            created_at: None,
            ..inside.clone()
        };

        let buckets = bucket_sales(&[inside, outside, missing_ts], from, to, &cal);
        let total: f64 = buckets.iter().map(|b| b.revenue).sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn inverted_window_yields_empty_series() {
        let cal = Calendar::utc();
        let buckets = bucket_sales(&[], date(2024, 3, 5), date(2024, 3, 1), &cal);
        assert!(buckets.is_empty());
    }

    proptest! {
        /// Multi-day `[from, to]` always yields (days between) + 1 buckets,
        /// chronologically sorted, all present even when empty.
        #[test]
        fn bucket_count_matches_day_span(start_day in 0u32..400, span in 1u32..90) {
            let cal = Calendar::utc();
            let from = date(2023, 1, 1) + chrono::Days::new(u64::from(start_day));
            let to = from + chrono::Days::new(u64::from(span));

            let buckets = bucket_sales(&[], from, to, &cal);
            prop_assert_eq!(buckets.len() as u32, span + 1);
            for pair in buckets.windows(2) {
                prop_assert!(pair[0].key < pair[1].key);
            }
        }

        /// A record on any day inside the window always lands in its bucket.
        #[test]
        fn in_window_record_is_never_dropped(day_offset in 0u32..30, ms in 0i64..MILLIS_PER_DAY) {
            let cal = Calendar::utc();
            let from = date(2024, 1, 1);
            let to = date(2024, 1, 31);
            let day = from + chrono::Days::new(u64::from(day_offset));
            let sale = sale_at(cal.start_of_day_millis(day) + ms, 1.0, 0.0, 0.0);

            let buckets = bucket_sales(&[sale], from, to, &cal);
            let total: f64 = buckets.iter().map(|b| b.revenue).sum();
            prop_assert_eq!(total, 1.0);
        }
    }
}
