use serde::{Deserialize, Serialize};

use super::CartLine;

/// Order payload posted to the back office.
///
/// Field names and value formats follow the order intake endpoint:
/// prices travel as display strings and are re-parsed server side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSubmission {
    pub customer: String,
    pub phone: String,
    /// `Entrega` or `Retirada`.
    pub method: String,
    /// Full delivery address, or `Retirada na Loja`.
    pub address: String,
    pub items: Vec<CartLine>,
    /// Final total as displayed, e.g. `R$ 89,70`.
    pub total: String,
    pub obs: String,
    /// Coupon code, `null` when none was applied.
    pub coupon: Option<String>,
    /// Delivery fee as displayed, e.g. `R$ 7,80`.
    pub fee: String,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    /// Change the driver must carry, empty when not paying cash.
    pub change: String,
}

/// Acknowledgement for a stored order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderReceipt {
    pub order_id: i64,
    /// Public link for the customer to track the order.
    #[serde(default)]
    pub order_link: Option<String>,
}
