//! `subsight-core` — domain foundation for the reseller ledger.
//!
//! This crate contains **pure domain** primitives (no I/O): the sale record
//! model as stored by the document store, strongly-typed identifiers, the
//! local-calendar primitive, grouping-key normalization, and the error model.

pub mod error;
pub mod id;
pub mod keys;
pub mod ledger;
pub mod sale;
pub mod time;

pub use error::{LedgerError, LedgerResult};
pub use id::{SaleId, SnapshotId};
pub use ledger::LedgerSnapshot;
pub use sale::{
    ClientInfo, ClientStatus, Credentials, Finance, Sale, ToolItem, ToolKind, VendorInfo,
    VendorStatus,
};
pub use time::Calendar;
