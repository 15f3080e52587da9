use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{OrderLineInput, OrderStatus, OrderView};

/// A catalog product as the order flow sees it: id and current price.
/// Existence is conveyed by `Option` at the gateway.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub price: BigDecimal,
}

/// Durable order + order-line storage. Multi-record mutations are expected
/// to happen as one unit of work, so an order is never readable with a total
/// that disagrees with its lines.
pub trait OrderRepository: Send + Sync + 'static {
    /// Persist a new PENDING order together with its lines and the
    /// engine-computed total.
    fn create(
        &self,
        owner_id: Uuid,
        lines: Vec<OrderLineInput>,
        total: BigDecimal,
    ) -> Result<OrderView, DomainError>;

    /// Replace the full line set of an order and store the recomputed total.
    /// Lines are never patched individually.
    fn replace_lines(
        &self,
        order_id: Uuid,
        lines: Vec<OrderLineInput>,
        total: BigDecimal,
    ) -> Result<OrderView, DomainError>;

    fn update_status(&self, order_id: Uuid, status: OrderStatus)
        -> Result<OrderView, DomainError>;

    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError>;

    fn list_all(&self) -> Result<Vec<OrderView>, DomainError>;

    fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
}

/// Read-only view onto the orchid catalog. Catalog maintenance is owned by
/// another service; the order flow never mutates it.
pub trait CatalogGateway: Send + Sync + 'static {
    fn resolve_product(&self, product_id: Uuid) -> Result<Option<Product>, DomainError>;
}
