//! `subsight-feed` — snapshot publish/subscribe plumbing.
//!
//! Carries complete ledger snapshots from the store to the analytics engine
//! and complete dashboard views from the engine to presentation. Aggregation
//! logic itself lives in `subsight-analytics` and stays free of subscription
//! concerns.

pub mod bus;
pub mod in_memory;

pub use bus::{FeedBus, Subscription};
pub use in_memory::{InMemoryFeed, InMemoryFeedError};
