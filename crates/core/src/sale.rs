//! The ledger's record type: one sale of one or more subscription-tool items.
//!
//! These structs mirror the document-store wire shape (camelCase fields,
//! epoch-millisecond `createdAt`). Records are append-mostly but editable;
//! the analytics engine always recomputes from the current snapshot, so
//! nothing here carries derived state.
//!
//! Tolerance rules (the engine must never crash on a malformed record):
//! - missing numeric fields deserialize as `0`
//! - missing or unparsable `createdAt` deserializes as `None`
//! - missing statuses default to the "outstanding" side (`Pending`/`Unpaid`),
//!   matching how the original store treats an absent status

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::id::SaleId;

/// Payment status of the client on a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    Clear,
    Pending,
    Partial,
}

impl Default for ClientStatus {
    fn default() -> Self {
        ClientStatus::Pending
    }
}

/// Settlement status towards the vendor on a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorStatus {
    Paid,
    Unpaid,
    Credit,
}

impl Default for VendorStatus {
    fn default() -> Self {
        VendorStatus::Unpaid
    }
}

/// How a tool subscription is provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Shared,
    Private,
    Screen,
}

impl Default for ToolKind {
    fn default() -> Self {
        ToolKind::Shared
    }
}

impl core::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ToolKind::Shared => "Shared",
            ToolKind::Private => "Private",
            ToolKind::Screen => "Screen",
        };
        f.write_str(s)
    }
}

/// Client (customer) contact block on a sale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub status: ClientStatus,
}

impl ClientInfo {
    /// A sale counts towards outstanding client exposure unless it is Clear.
    pub fn is_clear(&self) -> bool {
        self.status == ClientStatus::Clear
    }
}

/// Vendor contact block on a sale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: VendorStatus,
}

impl VendorInfo {
    /// A sale counts towards vendor dues unless it is Paid.
    pub fn is_paid(&self) -> bool {
        self.status == VendorStatus::Paid
    }
}

/// Login credentials handed to the customer. Carried through for the
/// surrounding application; analytics never reads them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// One subscription-tool line item on a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolItem {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ToolKind,
    /// Free text, may be empty ("No Plan" for grouping purposes).
    #[serde(default)]
    pub plan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
    #[serde(default)]
    pub sell: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

/// Precomputed financial totals on a sale.
///
/// Invariant upstream: `total_sell == Σ items.sell` and
/// `total_cost == Σ items.cost`. The engine trusts these fields and never
/// re-derives them from items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finance {
    #[serde(default)]
    pub total_sell: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub total_profit: f64,
    #[serde(default)]
    pub pending_amount: f64,
}

/// One transaction in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(default)]
    pub id: SaleId,
    /// Epoch milliseconds. `None` when the stored value is missing or not a
    /// number; such records are excluded from time-based filtering/bucketing.
    #[serde(default, deserialize_with = "de_epoch_millis")]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub client: ClientInfo,
    #[serde(default)]
    pub vendor: VendorInfo,
    #[serde(default)]
    pub items: Vec<ToolItem>,
    #[serde(default)]
    pub finance: Finance,
    #[serde(default)]
    pub instructions: String,
}

impl Sale {
    /// Sum of item sell prices, the per-customer spend contribution.
    pub fn items_sell_total(&self) -> f64 {
        self.items.iter().map(|i| i.sell).sum()
    }

    /// Sum of item cost prices.
    pub fn items_cost_total(&self) -> f64 {
        self.items.iter().map(|i| i.cost).sum()
    }
}

/// Accepts an integer, a float, or a numeric string; anything else is `None`.
fn de_epoch_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(Raw::Int(ms)) => Some(ms),
        Some(Raw::Float(ms)) if ms.is_finite() => Some(ms as i64),
        Some(Raw::Float(_)) => None,
        Some(Raw::Text(s)) => s.trim().parse::<i64>().ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_wire_shape() {
        let json = r#"{
            "id": "01890a5d-ac96-774b-bcce-b302099a8057",
            "createdAt": 1700000000000,
            "client": {"name": "Alice", "phone": "123", "status": "Clear"},
            "vendor": {"name": "Acme", "phone": "", "status": "Paid"},
            "items": [{
                "name": "Netflix",
                "type": "Shared",
                "plan": "Premium",
                "sell": 12.5,
                "cost": 8.0
            }],
            "finance": {"totalSell": 12.5, "totalCost": 8.0, "totalProfit": 4.5, "pendingAmount": 0.0},
            "instructions": "renew monthly"
        }"#;

        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.created_at, Some(1_700_000_000_000));
        assert_eq!(sale.client.status, ClientStatus::Clear);
        assert_eq!(sale.vendor.status, VendorStatus::Paid);
        assert_eq!(sale.items[0].kind, ToolKind::Shared);
        assert_eq!(sale.finance.total_sell, 12.5);
        assert_eq!(sale.items_sell_total(), 12.5);
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let sale: Sale = serde_json::from_str(r#"{"client": {"name": "Bob"}}"#).unwrap();
        assert_eq!(sale.created_at, None);
        assert_eq!(sale.client.phone, "");
        // Absent statuses land on the outstanding side.
        assert_eq!(sale.client.status, ClientStatus::Pending);
        assert_eq!(sale.vendor.status, VendorStatus::Unpaid);
        assert_eq!(sale.finance.total_sell, 0.0);
        assert!(sale.items.is_empty());
    }

    #[test]
    fn created_at_accepts_numeric_strings_and_rejects_garbage() {
        let sale: Sale =
            serde_json::from_str(r#"{"createdAt": "1700000000000"}"#).unwrap();
        assert_eq!(sale.created_at, Some(1_700_000_000_000));

        let sale: Sale = serde_json::from_str(r#"{"createdAt": "yesterday"}"#).unwrap();
        assert_eq!(sale.created_at, None);

        let sale: Sale = serde_json::from_str(r#"{"createdAt": null}"#).unwrap();
        assert_eq!(sale.created_at, None);
    }

    #[test]
    fn tool_kind_display_matches_wire_names() {
        assert_eq!(ToolKind::Shared.to_string(), "Shared");
        assert_eq!(ToolKind::Private.to_string(), "Private");
        assert_eq!(ToolKind::Screen.to_string(), "Screen");
    }
}
