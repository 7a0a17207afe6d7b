//! Vendor dues, vendor revenue, and global outstanding exposure.
//!
//! Dues and exposure are point-in-time outstanding balances, so they scan the
//! **entire unfiltered ledger** and are deliberately insensitive to the
//! active date filter. Vendor revenue feeds "top vendors" rankings and runs
//! over the filtered set like every other period metric.
//!
//! All three passes group vendors case-insensitively through
//! [`keys::vendor_key`], keeping the first-encountered original casing for
//! display.

use std::collections::HashMap;

use serde::Serialize;

use subsight_core::{Sale, keys};

/// Outstanding balance and lifetime revenue for one vendor, over the full
/// ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorDuesRecord {
    /// Normalized (uppercased) grouping key.
    pub key: String,
    /// First-encountered original casing, for display.
    pub name: String,
    /// Σ finance.totalCost over sales not yet paid to this vendor.
    pub outstanding: f64,
    /// Σ finance.totalSell over all of this vendor's sales.
    pub revenue: f64,
}

/// Period revenue for one vendor, over the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRevenue {
    pub key: String,
    pub name: String,
    pub revenue: f64,
}

/// Global outstanding exposure, over the full ledger.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exposure {
    /// Σ finance.pendingAmount where the client has not cleared.
    pub client_pending: f64,
    /// Σ finance.totalCost where the vendor is not paid.
    pub vendor_dues: f64,
}

/// Per-vendor dues over the ENTIRE ledger (never the filtered subset).
pub fn vendor_dues(all_sales: &[Sale]) -> Vec<VendorDuesRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut records: Vec<VendorDuesRecord> = Vec::new();

    for sale in all_sales {
        let key = keys::vendor_key(&sale.vendor);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            records.push(VendorDuesRecord {
                key,
                name: sale.vendor.name.trim().to_string(),
                outstanding: 0.0,
                revenue: 0.0,
            });
            records.len() - 1
        });
        let record = &mut records[slot];
        record.revenue += sale.finance.total_sell;
        if !sale.vendor.is_paid() {
            record.outstanding += sale.finance.total_cost;
        }
    }

    records
}

/// Per-vendor revenue over the filtered set, for top-vendor rankings.
pub fn vendor_revenue(filtered: &[Sale]) -> Vec<VendorRevenue> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut records: Vec<VendorRevenue> = Vec::new();

    for sale in filtered {
        let key = keys::vendor_key(&sale.vendor);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            records.push(VendorRevenue {
                key,
                name: sale.vendor.name.trim().to_string(),
                revenue: 0.0,
            });
            records.len() - 1
        });
        records[slot].revenue += sale.finance.total_sell;
    }

    records
}

/// Global outstanding exposure over the ENTIRE ledger.
pub fn exposure(all_sales: &[Sale]) -> Exposure {
    let mut totals = Exposure::default();
    for sale in all_sales {
        if !sale.client.is_clear() {
            totals.client_pending += sale.finance.pending_amount;
        }
        if !sale.vendor.is_paid() {
            totals.vendor_dues += sale.finance.total_cost;
        }
    }
    totals
}
