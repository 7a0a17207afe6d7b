//! Named output views consumed by presentation.
//!
//! The assembler composes the aggregation passes into one immutable
//! [`DashboardView`]. Everything here is a pure function of (full ledger,
//! filtered subset, bucket window); no stage mutates shared state, and the
//! whole view is rebuilt from scratch on every recomputation.

use chrono::NaiveDate;
use serde::Serialize;

use subsight_core::{Calendar, Sale};

use crate::buckets::{TimeBucket, bucket_sales};
use crate::customers::aggregate_customers;
use crate::rank::{LEADERBOARD_LIMIT, RankingEntry, SHORT_RANK_LIMIT, top_n};
use crate::tools::aggregate_tool_loyalty;
use crate::vendors::{Exposure, exposure, vendor_dues, vendor_revenue};

/// Customer-loyalty table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStatsView {
    pub name: String,
    pub phone: String,
    pub total_spent: f64,
    pub order_count: u32,
    /// Variant-scoped renewal count (see `customers`).
    pub renewals: u32,
    /// Display key of the most-purchased variant, if any.
    pub top_tool: Option<String>,
    pub first_order_at: Option<i64>,
    pub last_order_at: Option<i64>,
}

/// Tool-popularity table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolLoyaltyView {
    pub name: String,
    pub total_sales: u32,
    pub revenue: f64,
    pub distinct_customers: u32,
    /// Count-scoped renewal count (see `tools`).
    pub renewals: u32,
    /// `renewals / distinct_customers * 100`, one decimal, 0 when no customers.
    pub growth_rate: f64,
}

/// Vendor-dues table row (full-ledger outstanding balance).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDuesView {
    pub name: String,
    pub outstanding: f64,
    pub revenue: f64,
}

/// Parallel arrays for trend charts, in chronological label order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub revenue: Vec<f64>,
    pub profit: Vec<f64>,
    pub cost: Vec<f64>,
}

impl TimeSeries {
    pub fn from_buckets(buckets: &[TimeBucket]) -> Self {
        Self {
            labels: buckets.iter().map(|b| b.label.clone()).collect(),
            revenue: buckets.iter().map(|b| b.revenue).collect(),
            profit: buckets.iter().map(|b| b.profit).collect(),
            cost: buckets.iter().map(|b| b.cost).collect(),
        }
    }
}

/// Headline sums over the filtered window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub sales_count: u32,
    pub customer_count: u32,
}

/// Everything a dashboard render needs, rebuilt whole on every recomputation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub customers: Vec<CustomerStatsView>,
    pub tools: Vec<ToolLoyaltyView>,
    pub vendor_dues: Vec<VendorDuesView>,
    pub trend: TimeSeries,
    pub top_vendors: Vec<RankingEntry>,
    pub top_items: Vec<RankingEntry>,
    pub top_dues: Vec<RankingEntry>,
    pub renewal_leaderboard: Vec<RankingEntry>,
    pub exposure: Exposure,
    pub totals: DashboardTotals,
}

/// Percentage of `numerator` against `denominator`, rounded to one decimal.
///
/// A zero denominator yields 0, never NaN or infinity. Used for growth rates
/// and bar-chart relative widths alike.
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator * 100.0;
    if !ratio.is_finite() {
        return 0.0;
    }
    (ratio * 10.0).round() / 10.0
}

/// Compose all aggregation passes into one dashboard view.
///
/// `all_sales` is the full ledger (dues and exposure ignore the filter);
/// `filtered` is the window subset; `window` is the `[from, to]` span handed
/// to the bucketer.
pub fn assemble_dashboard(
    all_sales: &[Sale],
    filtered: &[Sale],
    window: (NaiveDate, NaiveDate),
    calendar: &Calendar,
) -> DashboardView {
    let profiles = aggregate_customers(filtered);
    let loyalty = aggregate_tool_loyalty(filtered);
    let dues = vendor_dues(all_sales);
    let revenue = vendor_revenue(filtered);
    let buckets = bucket_sales(filtered, window.0, window.1, calendar);

    let mut customers: Vec<CustomerStatsView> = profiles
        .iter()
        .map(|p| CustomerStatsView {
            name: p.name.clone(),
            phone: p.phone.clone(),
            total_spent: p.total_spent,
            order_count: p.order_count,
            renewals: p.renewals(),
            top_tool: p.top_variant().map(|v| v.key.clone()),
            first_order_at: p.first_order_at,
            last_order_at: p.last_order_at,
        })
        .collect();
    customers.sort_by(|a, b| {
        b.total_spent
            .total_cmp(&a.total_spent)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut tools: Vec<ToolLoyaltyView> = loyalty
        .iter()
        .map(|t| ToolLoyaltyView {
            name: t.name.clone(),
            total_sales: t.total_sales,
            revenue: t.revenue,
            distinct_customers: t.distinct_customers,
            renewals: t.renewals,
            growth_rate: percent(f64::from(t.renewals), f64::from(t.distinct_customers)),
        })
        .collect();
    tools.sort_by(|a, b| b.revenue.total_cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));

    let mut dues_views: Vec<VendorDuesView> = dues
        .iter()
        .map(|d| VendorDuesView {
            name: d.name.clone(),
            outstanding: d.outstanding,
            revenue: d.revenue,
        })
        .collect();
    dues_views.sort_by(|a, b| {
        b.outstanding
            .total_cmp(&a.outstanding)
            .then_with(|| a.name.cmp(&b.name))
    });

    let top_vendors = top_n(
        revenue.iter().map(|v| (v.name.clone(), v.revenue)),
        SHORT_RANK_LIMIT,
    );
    let top_items = top_n(
        loyalty.iter().map(|t| (t.name.clone(), t.revenue)),
        SHORT_RANK_LIMIT,
    );
    let top_dues = top_n(
        dues.iter().map(|d| (d.name.clone(), d.outstanding)),
        SHORT_RANK_LIMIT,
    );
    let renewal_leaderboard = top_n(
        loyalty.iter().map(|t| (t.name.clone(), f64::from(t.renewals))),
        LEADERBOARD_LIMIT,
    );

    let totals = DashboardTotals {
        revenue: filtered.iter().map(|s| s.finance.total_sell).sum(),
        cost: filtered.iter().map(|s| s.finance.total_cost).sum(),
        profit: filtered.iter().map(|s| s.finance.total_profit).sum(),
        sales_count: filtered.len() as u32,
        customer_count: customers.len() as u32,
    };

    DashboardView {
        customers,
        tools,
        vendor_dues: dues_views,
        trend: TimeSeries::from_buckets(&buckets),
        top_vendors,
        top_items,
        top_dues,
        renewal_leaderboard,
        exposure: exposure(all_sales),
        totals,
    }
}
