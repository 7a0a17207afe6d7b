//! Per-customer derived profiles.
//!
//! One pass over the filtered set builds a profile per grouping key (phone,
//! falling back to name). Renewal counting here is **variant-scoped**: each
//! exact tool+kind+plan combination bought more than once contributes
//! `count - 1`. This is deliberately a different rule from the tool-loyalty
//! one in [`crate::tools`]; the two feed different dashboard surfaces and
//! must not be unified.

use std::collections::HashMap;

use serde::Serialize;

use subsight_core::sale::ToolKind;
use subsight_core::{Sale, keys};

/// Occurrence counter for one exact tool+kind+plan combination bought by one
/// customer. Two purchases of "Netflix/Shared/Premium" are a renewal of each
/// other; "Netflix/Shared/Premium" and "Netflix/Private/Standard" are not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolVariant {
    pub key: String,
    pub name: String,
    pub kind: ToolKind,
    pub plan: String,
    pub purchases: u32,
}

/// Derived profile for one customer over the filtered record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerProfile {
    pub key: String,
    pub name: String,
    pub phone: String,
    pub total_spent: f64,
    pub order_count: u32,
    pub first_order_at: Option<i64>,
    pub last_order_at: Option<i64>,
    /// Variants in first-encounter order; `top_variant` ties resolve to the
    /// earliest encountered.
    pub variants: Vec<ToolVariant>,
}

impl CustomerProfile {
    fn new(key: String, sale: &Sale) -> Self {
        Self {
            key,
            name: sale.client.name.trim().to_string(),
            phone: sale.client.phone.trim().to_string(),
            total_spent: 0.0,
            order_count: 0,
            first_order_at: None,
            last_order_at: None,
            variants: Vec::new(),
        }
    }

    /// Variant-scoped renewal count: `Σ max(0, purchases - 1)` over variants.
    pub fn renewals(&self) -> u32 {
        self.variants
            .iter()
            .map(|v| v.purchases.saturating_sub(1))
            .sum()
    }

    /// The variant this customer bought most often; first-encountered wins
    /// ties.
    pub fn top_variant(&self) -> Option<&ToolVariant> {
        let mut best: Option<&ToolVariant> = None;
        for variant in &self.variants {
            if best.is_none_or(|b| variant.purchases > b.purchases) {
                best = Some(variant);
            }
        }
        best
    }
}

/// Build per-customer profiles from the filtered record set.
///
/// Profiles come back in first-encounter order, which makes the output a
/// deterministic function of the input ordering; presentation sorting happens
/// in the view assembler.
pub fn aggregate_customers(sales: &[Sale]) -> Vec<CustomerProfile> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut profiles: Vec<CustomerProfile> = Vec::new();

    for sale in sales {
        let key = keys::customer_key(&sale.client);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            profiles.push(CustomerProfile::new(key, sale));
            profiles.len() - 1
        });
        let profile = &mut profiles[slot];

        profile.total_spent += sale.items_sell_total();
        profile.order_count += 1;
        if let Some(ts) = sale.created_at {
            profile.first_order_at = Some(profile.first_order_at.map_or(ts, |t| t.min(ts)));
            profile.last_order_at = Some(profile.last_order_at.map_or(ts, |t| t.max(ts)));
        }

        for item in &sale.items {
            let variant_key = keys::variant_key(item);
            match profile.variants.iter_mut().find(|v| v.key == variant_key) {
                Some(variant) => variant.purchases += 1,
                None => {
                    let plan = item.plan.trim();
                    profile.variants.push(ToolVariant {
                        key: variant_key,
                        name: item.name.trim().to_string(),
                        kind: item.kind,
                        plan: if plan.is_empty() {
                            keys::NO_PLAN.to_string()
                        } else {
                            plan.to_string()
                        },
                        purchases: 1,
                    });
                }
            }
        }
    }

    profiles
}
