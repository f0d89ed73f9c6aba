//! Order domain entity.
//! Customer purchases composed of line items, with a bounded status lifecycle.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Forward-only lifecycle. Re-applying the current status is accepted as a no-op.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        *self == next
            || matches!(
                (*self, next),
                (Processing, Shipped)
                    | (Processing, Cancelled)
                    | (Shipped, Delivered)
                    | (Shipped, Cancelled)
            )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(with = "super::money")]
    pub price: BigDecimal,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> BigDecimal {
        self.price.clone() * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(with = "super::money")]
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Builds an order, deriving `total` from the items.
    pub fn new(
        id: String,
        customer_name: String,
        customer_email: String,
        items: Vec<OrderItem>,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        let total = order_total(&items);
        Self {
            id,
            customer_name,
            customer_email,
            total,
            status,
            created_at,
            items,
        }
    }

    pub fn belongs_to(&self, email: &str) -> bool {
        self.customer_email.eq_ignore_ascii_case(email.trim())
    }

    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Sum of `price * quantity`, rounded to cents.
pub fn order_total(items: &[OrderItem]) -> BigDecimal {
    items
        .iter()
        .map(OrderItem::line_total)
        .fold(BigDecimal::from(0), |acc, x| acc + x)
        .round(2)
        .with_scale(2)
}

/// Order data before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
}

impl NewOrder {
    pub fn new(customer_name: String, customer_email: String, items: Vec<OrderItem>) -> Self {
        Self {
            customer_name,
            customer_email,
            items,
            status: OrderStatus::Processing,
        }
    }

    pub fn into_order(self, id: String, created_at: DateTime<Utc>) -> Order {
        Order::new(
            id,
            self.customer_name,
            self.customer_email,
            self.items,
            self.status,
            created_at,
        )
    }
}
