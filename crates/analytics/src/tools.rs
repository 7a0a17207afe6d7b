//! Per-tool loyalty aggregation.
//!
//! Groups line items by tool **name only**, collapsing across kind, plan and
//! customer. Renewal counting here is **count-scoped**:
//! `renewals = max(0, total_sales - distinct_customers)`: every line item
//! beyond the first per distinct customer is treated as a repeat purchase.
//! This is a materially different rule from the variant-scoped one in
//! [`crate::customers`]; both are required outputs.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use subsight_core::{Sale, keys};

/// Derived loyalty record for one tool over the filtered record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolLoyaltyRecord {
    pub name: String,
    /// Line items sold, across all customers and variants.
    pub total_sales: u32,
    /// Σ item sell prices.
    pub revenue: f64,
    pub distinct_customers: u32,
    /// Count-scoped renewals: `max(0, total_sales - distinct_customers)`.
    pub renewals: u32,
}

struct Accumulator {
    name: String,
    total_sales: u32,
    revenue: f64,
    customers: HashSet<String>,
}

/// Build per-tool loyalty records from the filtered record set, in
/// first-encounter order.
pub fn aggregate_tool_loyalty(sales: &[Sale]) -> Vec<ToolLoyaltyRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tools: Vec<Accumulator> = Vec::new();

    for sale in sales {
        let customer = keys::customer_key(&sale.client);
        for item in &sale.items {
            let name = item.name.trim().to_string();
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                tools.push(Accumulator {
                    name,
                    total_sales: 0,
                    revenue: 0.0,
                    customers: HashSet::new(),
                });
                tools.len() - 1
            });
            let tool = &mut tools[slot];
            tool.total_sales += 1;
            tool.revenue += item.sell;
            tool.customers.insert(customer.clone());
        }
    }

    tools
        .into_iter()
        .map(|acc| {
            let distinct = acc.customers.len() as u32;
            ToolLoyaltyRecord {
                name: acc.name,
                total_sales: acc.total_sales,
                revenue: acc.revenue,
                distinct_customers: distinct,
                renewals: acc.total_sales.saturating_sub(distinct),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use subsight_core::sale::ToolKind;
    use subsight_core::{ClientInfo, SaleId, ToolItem};

    fn item(name: &str, sell: f64) -> ToolItem {
        ToolItem {
            name: name.to_string(),
            kind: ToolKind::Shared,
            plan: String::new(),
            purchased_at: None,
            expires_at: None,
            sell,
            cost: 0.0,
            credentials: None,
        }
    }

    fn sale(phone: &str, items: Vec<ToolItem>) -> Sale {
        Sale {
            id: SaleId::new(),
            created_at: Some(0),
            client: ClientInfo {
                name: phone.to_string(),
                phone: phone.to_string(),
                ..ClientInfo::default()
            },
            vendor: Default::default(),
            items,
            finance: Default::default(),
            instructions: String::new(),
        }
    }

    #[test]
    fn five_items_across_two_customers_count_three_renewals() {
        // Scenario: Canva sold to 2 distinct customers across 5 line items.
        let sales = vec![
            sale("1", vec![item("Canva", 5.0), item("Canva", 5.0)]),
            sale("2", vec![item("Canva", 5.0)]),
            sale("1", vec![item("Canva", 5.0), item("Canva", 5.0)]),
        ];

        let records = aggregate_tool_loyalty(&sales);
        assert_eq!(records.len(), 1);
        let canva = &records[0];
        assert_eq!(canva.total_sales, 5);
        assert_eq!(canva.distinct_customers, 2);
        assert_eq!(canva.renewals, 3);
        assert_eq!(canva.revenue, 25.0);
    }

    #[test]
    fn kind_and_plan_collapse_into_one_tool() {
        let sales = vec![sale(
            "1",
            vec![
                ToolItem {
                    plan: "Premium".to_string(),
                    ..item("Netflix", 12.0)
                },
                ToolItem {
                    kind: ToolKind::Private,
                    ..item("Netflix", 20.0)
                },
            ],
        )];

        let records = aggregate_tool_loyalty(&sales);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_sales, 2);
        assert_eq!(records[0].revenue, 32.0);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(aggregate_tool_loyalty(&[]).is_empty());
    }

    proptest! {
        /// `renewals == max(0, total_sales - distinct_customers)` for all tools.
        #[test]
        fn renewal_formula_holds(
            purchases in prop::collection::vec((0u8..4, 0u8..3), 0..30)
        ) {
            let sales: Vec<Sale> = purchases
                .iter()
                .map(|(customer, tool)| {
                    sale(&format!("{customer}"), vec![item(&format!("Tool{tool}"), 1.0)])
                })
                .collect();

            for record in aggregate_tool_loyalty(&sales) {
                prop_assert_eq!(
                    record.renewals,
                    record.total_sales.saturating_sub(record.distinct_customers)
                );
                prop_assert!(record.distinct_customers <= record.total_sales);
            }
        }
    }
}
