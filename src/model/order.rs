//! Order list entities.

use crate::model::identifiers::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order.
///
/// Wire format is SCREAMING_SNAKE_CASE (`"CREATED"`, `"PROCESSING"`, ...),
/// matching the REST backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order placed, payment pending or just confirmed.
    Created,
    /// Payment confirmed, warehouse picking.
    Processing,
    /// Handed to the carrier.
    Shipping,
    /// Received by the customer.
    Delivered,
    /// Cancelled before shipment.
    Annulled,
    /// Returned and refunded.
    Refunded,
}

impl OrderStatus {
    /// All statuses in lifecycle order, for rendering filter chips.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Created,
        OrderStatus::Processing,
        OrderStatus::Shipping,
        OrderStatus::Delivered,
        OrderStatus::Annulled,
        OrderStatus::Refunded,
    ];

    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Annulled => "ANNULLED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the orders list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Order identifier.
    pub id: OrderId,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Promised or actual delivery date.
    pub delivery_date: DateTime<Utc>,
    /// Grand total in the shop currency.
    pub total_price: f64,
    /// Current lifecycle state.
    pub status: OrderStatus,
}
