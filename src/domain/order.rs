use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// Lifecycle states of an order.
///
/// `Processing` is representable and round-trips through the store, but no
/// operation currently transitions into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::Internal(format!(
                "Unknown order status '{other}' in store"
            ))),
        }
    }
}

/// One cart entry as submitted by a caller. Prices never travel with the
/// request; they are snapshotted from the catalog by the engine.
#[derive(Debug, Clone)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A cart entry after product resolution, carrying the snapshotted price.
#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// An order joined with its lines, as returned by every read path.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

/// Σ(unit_price × quantity) over the given lines. The stored total is always
/// derived through this, never taken from a caller.
pub fn total_of(lines: &[OrderLineInput]) -> BigDecimal {
    lines.iter().fold(BigDecimal::from(0), |acc, l| {
        acc + &l.unit_price * BigDecimal::from(l.quantity)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit_price: &str) -> OrderLineInput {
        OrderLineInput {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price: unit_price.parse().expect("valid decimal"),
        }
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let total = total_of(&[line(2, "100000"), line(1, "220000")]);
        assert_eq!(total, "420000".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn total_of_empty_line_set_is_zero() {
        assert_eq!(total_of(&[]), BigDecimal::from(0));
    }

    #[test]
    fn total_keeps_decimal_precision() {
        let total = total_of(&[line(3, "29.99")]);
        assert_eq!(total, "89.97".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_string_is_an_internal_error() {
        let err = "SHIPPED".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
