//! Derived analytics over the sales ledger.
//!
//! Everything in this crate is a pure function of an immutable
//! [`LedgerSnapshot`](subsight_core::LedgerSnapshot) plus a range filter:
//! filter, aggregate, rank, assemble, recomputed whole on every change.
//! There is no incremental accumulator to corrupt; determinism and
//! replaceability are the design goals, not incrementality.
//!
//! The crate splits into:
//! - [`filter`]: range descriptors and their resolution to concrete bounds
//! - [`customers`], [`tools`], [`vendors`]: the aggregation passes
//! - [`buckets`], [`rank`]: series bucketing and top-N selection
//! - [`views`]: the assembled output types
//! - [`engine`]: memoized recomputation entry point
//! - [`service`]: reactive wiring over the snapshot feed
//! - [`export`]: handoff of the filtered subset to external exporters

pub mod buckets;
pub mod customers;
pub mod engine;
pub mod export;
pub mod filter;
pub mod rank;
pub mod service;
pub mod tools;
pub mod vendors;
pub mod views;


pub use buckets::{TimeBucket, bucket_sales};
pub use customers::{CustomerProfile, ToolVariant, aggregate_customers};
pub use engine::AnalyticsEngine;
pub use export::{ColumnPrefs, ExportBatch};
pub use filter::{RangeFilter, RangeMode, ResolvedRange, filter_sales};
pub use rank::{LEADERBOARD_LIMIT, RankingEntry, SHORT_RANK_LIMIT, top_n};
pub use service::AnalyticsService;
pub use tools::{ToolLoyaltyRecord, aggregate_tool_loyalty};
pub use vendors::{Exposure, VendorDuesRecord, VendorRevenue, exposure, vendor_dues, vendor_revenue};
pub use views::{
    CustomerStatsView, DashboardTotals, DashboardView, TimeSeries, ToolLoyaltyView,
    VendorDuesView, assemble_dashboard, percent,
};
