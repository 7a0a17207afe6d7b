//! Ledger snapshot: the authoritative current state, pushed whole.
//!
//! The external store never diffs; every change delivers the complete record
//! array. Consumers replace whatever they held before (last write wins).

use std::sync::Arc;

use crate::id::SnapshotId;
use crate::sale::Sale;

/// The full collection of sale records for one account, as of one push.
///
/// Cloning is cheap (the record array is shared behind an `Arc`); the id is
/// the memoization key for downstream recomputation.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    id: SnapshotId,
    sales: Arc<Vec<Sale>>,
}

impl LedgerSnapshot {
    /// Wrap a freshly pushed record array under a new snapshot identity.
    pub fn new(sales: Vec<Sale>) -> Self {
        Self {
            id: SnapshotId::new(),
            sales: Arc::new(sales),
        }
    }

    /// Rebuild a snapshot under a known identity (tests, replay).
    pub fn with_id(id: SnapshotId, sales: Vec<Sale>) -> Self {
        Self {
            id,
            sales: Arc::new(sales),
        }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}
