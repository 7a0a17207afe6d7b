//! Export boundary.
//!
//! The engine hands the currently filtered record subset to an external
//! tabular-export routine. The column schema is the caller's: a preference
//! map of column name to included flag, passed through untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use subsight_core::Sale;

/// Caller-supplied column preference map. `BTreeMap` keeps the enabled-column
/// list deterministic.
pub type ColumnPrefs = BTreeMap<String, bool>;

/// The filtered subset paired with the caller's enabled columns, ready for an
/// external exporter.
#[derive(Debug, Clone)]
pub struct ExportBatch {
    pub columns: Vec<String>,
    pub records: Arc<Vec<Sale>>,
}

/// Names of the columns the caller switched on, in name order.
pub fn enabled_columns(prefs: &ColumnPrefs) -> Vec<String> {
    prefs
        .iter()
        .filter(|&(_, &included)| included)
        .map(|(name, _)| name.clone())
        .collect()
}
