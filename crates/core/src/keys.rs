//! Grouping-key normalization.
//!
//! Every aggregation pass in the engine derives its map keys through these
//! functions, so the (sometimes lossy) grouping rules live in exactly one
//! place:
//!
//! - customers group by phone, falling back to name when the phone is empty
//!   (two phoneless customers sharing a display name will merge; accepted)
//! - tool variants group by `name-kind-plan`, the renewal-detection unit for
//!   a single customer
//! - vendors group case-insensitively (trimmed, uppercased); callers keep the
//!   first-encountered original casing around for display

use crate::sale::{ClientInfo, ToolItem, VendorInfo};

/// Placeholder plan text used when an item's plan is empty.
pub const NO_PLAN: &str = "No Plan";

/// Grouping key for a customer: trimmed phone, else trimmed name.
pub fn customer_key(client: &ClientInfo) -> String {
    let phone = client.phone.trim();
    if phone.is_empty() {
        client.name.trim().to_string()
    } else {
        phone.to_string()
    }
}

/// Grouping key for one exact tool+kind+plan combination.
pub fn variant_key(item: &ToolItem) -> String {
    let plan = item.plan.trim();
    let plan = if plan.is_empty() { NO_PLAN } else { plan };
    format!("{}-{}-{}", item.name.trim(), item.kind, plan)
}

/// Case-insensitive grouping key for a vendor.
pub fn vendor_key(vendor: &VendorInfo) -> String {
    vendor.name.trim().to_uppercase()
}
