use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::identity::{self, Identity, ADMIN_ROLE};
use crate::domain::order::{total_of, OrderLineInput, OrderLineRequest, OrderStatus, OrderView};
use crate::domain::ports::{CatalogGateway, OrderRepository};

/// The order lifecycle engine: cart validation, catalog price snapshotting,
/// total computation, status transitions and authorization. All state lives
/// behind the two ports.
pub struct OrderService<R, C> {
    repo: R,
    catalog: C,
}

impl<R: OrderRepository, C: CatalogGateway> OrderService<R, C> {
    pub fn new(repo: R, catalog: C) -> Self {
        Self { repo, catalog }
    }

    /// Create a PENDING order owned by the caller. Each line's unit price is
    /// snapshotted from the catalog at this instant and stays immune to later
    /// catalog price changes.
    pub fn create_order(
        &self,
        caller: &Identity,
        requests: Vec<OrderLineRequest>,
    ) -> Result<OrderView, DomainError> {
        let lines = self.resolve_lines(requests)?;
        let total = total_of(&lines);
        let view = self.repo.create(caller.id, lines, total)?;
        log::info!(
            "order {} created for account {} ({} lines, total {})",
            view.id,
            caller.id,
            view.lines.len(),
            view.total_amount
        );
        Ok(view)
    }

    /// Replace the line set of a PENDING order and recompute its total.
    /// The new lines are priced at the catalog's current rates.
    pub fn update_order(
        &self,
        _caller: &Identity,
        order_id: Uuid,
        requests: Vec<OrderLineRequest>,
    ) -> Result<OrderView, DomainError> {
        let existing = self.load(order_id)?;
        if existing.status != OrderStatus::Pending {
            return Err(DomainError::InvalidState(
                "Order is not in PENDING status and cannot be updated".to_string(),
            ));
        }
        let lines = self.resolve_lines(requests)?;
        let total = total_of(&lines);
        self.repo.replace_lines(order_id, lines, total)
    }

    /// Mark a PENDING order COMPLETED. Only the owning account may pay.
    pub fn pay_order(&self, caller: &Identity, order_id: Uuid) -> Result<OrderView, DomainError> {
        let existing = self.load(order_id)?;
        if existing.status != OrderStatus::Pending {
            return Err(DomainError::InvalidState(
                "Order is not in PENDING status".to_string(),
            ));
        }
        if existing.owner_id != caller.id {
            return Err(DomainError::Forbidden(
                "You are not authorized to pay this order".to_string(),
            ));
        }
        let view = self.repo.update_status(order_id, OrderStatus::Completed)?;
        log::info!("order {} paid by account {}", order_id, caller.id);
        Ok(view)
    }

    /// Soft delete: the order is marked CANCELLED whatever its current
    /// status, and its lines are kept.
    pub fn cancel_order(
        &self,
        _caller: &Identity,
        order_id: Uuid,
    ) -> Result<OrderView, DomainError> {
        self.load(order_id)?;
        self.repo.update_status(order_id, OrderStatus::Cancelled)
    }

    /// Read one order with its lines. Owner or ADMIN only.
    pub fn get_order(&self, caller: &Identity, order_id: Uuid) -> Result<OrderView, DomainError> {
        let view = self.load(order_id)?;
        identity::require_owner_or_role(caller, view.owner_id, ADMIN_ROLE)?;
        Ok(view)
    }

    /// Every order in the store, joined with lines. ADMIN only.
    pub fn list_all_orders(&self, caller: &Identity) -> Result<Vec<OrderView>, DomainError> {
        identity::require_role(caller, ADMIN_ROLE)?;
        self.repo.list_all()
    }

    /// The caller's own orders, joined with lines.
    pub fn list_orders_for_caller(&self, caller: &Identity) -> Result<Vec<OrderView>, DomainError> {
        self.repo.list_by_owner(caller.id)
    }

    fn load(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        self.repo
            .find_by_id(order_id)?
            .ok_or(DomainError::OrderNotFound(order_id))
    }

    /// Validate the cart shape and snapshot each product's current catalog
    /// price into a line input.
    fn resolve_lines(
        &self,
        requests: Vec<OrderLineRequest>,
    ) -> Result<Vec<OrderLineInput>, DomainError> {
        if requests.is_empty() {
            return Err(DomainError::Validation(
                "At least one order line is required".to_string(),
            ));
        }
        requests
            .into_iter()
            .map(|r| {
                if r.quantity <= 0 {
                    return Err(DomainError::Validation(format!(
                        "Quantity must be positive for orchid {}",
                        r.product_id
                    )));
                }
                let product = self
                    .catalog
                    .resolve_product(r.product_id)?
                    .ok_or(DomainError::ProductNotFound(r.product_id))?;
                if product.price < BigDecimal::from(0) {
                    return Err(DomainError::Validation(format!(
                        "Orchid {} has a negative catalog price",
                        r.product_id
                    )));
                }
                Ok(OrderLineInput {
                    product_id: r.product_id,
                    quantity: r.quantity,
                    unit_price: product.price,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::order::OrderLineView;
    use crate::domain::ports::Product;

    /// Store fake backed by a shared map; clones share state so tests can
    /// inspect and mutate behind the service's back.
    #[derive(Clone, Default)]
    struct InMemoryOrders(Arc<Mutex<HashMap<Uuid, OrderView>>>);

    impl OrderRepository for InMemoryOrders {
        fn create(
            &self,
            owner_id: Uuid,
            lines: Vec<OrderLineInput>,
            total: BigDecimal,
        ) -> Result<OrderView, DomainError> {
            let order_id = Uuid::new_v4();
            let view = OrderView {
                id: order_id,
                owner_id,
                total_amount: total,
                status: OrderStatus::Pending,
                order_date: Utc::now(),
                lines: to_views(order_id, lines),
            };
            self.0.lock().unwrap().insert(order_id, view.clone());
            Ok(view)
        }

        fn replace_lines(
            &self,
            order_id: Uuid,
            lines: Vec<OrderLineInput>,
            total: BigDecimal,
        ) -> Result<OrderView, DomainError> {
            let mut orders = self.0.lock().unwrap();
            let view = orders
                .get_mut(&order_id)
                .ok_or(DomainError::OrderNotFound(order_id))?;
            view.lines = to_views(order_id, lines);
            view.total_amount = total;
            Ok(view.clone())
        }

        fn update_status(
            &self,
            order_id: Uuid,
            status: OrderStatus,
        ) -> Result<OrderView, DomainError> {
            let mut orders = self.0.lock().unwrap();
            let view = orders
                .get_mut(&order_id)
                .ok_or(DomainError::OrderNotFound(order_id))?;
            view.status = status;
            Ok(view.clone())
        }

        fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError> {
            Ok(self.0.lock().unwrap().get(&order_id).cloned())
        }

        fn list_all(&self) -> Result<Vec<OrderView>, DomainError> {
            Ok(self.0.lock().unwrap().values().cloned().collect())
        }

        fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .values()
                .filter(|o| o.owner_id == owner_id)
                .cloned()
                .collect())
        }
    }

    fn to_views(order_id: Uuid, lines: Vec<OrderLineInput>) -> Vec<OrderLineView> {
        lines
            .into_iter()
            .map(|l| OrderLineView {
                id: Uuid::new_v4(),
                order_id,
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect()
    }

    #[derive(Clone, Default)]
    struct FakeCatalog(Arc<Mutex<HashMap<Uuid, Product>>>);

    impl FakeCatalog {
        fn put(&self, price: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.0.lock().unwrap().insert(
                id,
                Product {
                    id,
                    price: BigDecimal::from_str(price).expect("valid decimal"),
                },
            );
            id
        }
    }

    impl CatalogGateway for FakeCatalog {
        fn resolve_product(&self, product_id: Uuid) -> Result<Option<Product>, DomainError> {
            Ok(self.0.lock().unwrap().get(&product_id).cloned())
        }
    }

    struct Fixture {
        service: OrderService<InMemoryOrders, FakeCatalog>,
        orders: InMemoryOrders,
        catalog: FakeCatalog,
    }

    fn fixture() -> Fixture {
        let orders = InMemoryOrders::default();
        let catalog = FakeCatalog::default();
        Fixture {
            service: OrderService::new(orders.clone(), catalog.clone()),
            orders,
            catalog,
        }
    }

    fn customer() -> Identity {
        Identity::new(Uuid::new_v4(), ["CUSTOMER".to_string()])
    }

    fn admin() -> Identity {
        Identity::new(Uuid::new_v4(), ["ADMIN".to_string()])
    }

    fn req(product_id: Uuid, quantity: i32) -> OrderLineRequest {
        OrderLineRequest {
            product_id,
            quantity,
        }
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn create_snapshots_prices_and_computes_total() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let b = fx.catalog.put("220000");
        let owner = customer();

        let order = fx
            .service
            .create_order(&owner, vec![req(a, 2), req(b, 1)])
            .expect("create failed");

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.owner_id, owner.id);
        assert_eq!(order.total_amount, dec("420000"));
        assert_eq!(order.lines.len(), 2);
        let line_a = order.lines.iter().find(|l| l.product_id == a).unwrap();
        assert_eq!(line_a.quantity, 2);
        assert_eq!(line_a.unit_price, dec("100000"));
    }

    #[test]
    fn create_rejects_empty_cart() {
        let fx = fixture();
        let err = fx.service.create_order(&customer(), vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_non_positive_quantity() {
        let fx = fixture();
        let a = fx.catalog.put("5.00");
        let err = fx
            .service
            .create_order(&customer(), vec![req(a, 0)])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_fails_for_unknown_product() {
        let fx = fixture();
        let missing = Uuid::new_v4();
        let err = fx
            .service
            .create_order(&customer(), vec![req(missing, 1)])
            .unwrap_err();
        assert!(matches!(err, DomainError::ProductNotFound(id) if id == missing));
        assert!(fx.orders.list_all().unwrap().is_empty());
    }

    #[test]
    fn update_replaces_line_set_and_recomputes_total() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let b = fx.catalog.put("220000");
        let owner = customer();
        let created = fx
            .service
            .create_order(&owner, vec![req(a, 2)])
            .expect("create failed");

        let updated = fx
            .service
            .update_order(&owner, created.id, vec![req(b, 3)])
            .expect("update failed");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.owner_id, created.owner_id);
        assert_eq!(updated.order_date, created.order_date);
        assert_eq!(updated.lines.len(), 1);
        assert_eq!(updated.lines[0].product_id, b);
        assert_eq!(updated.total_amount, dec("660000"));
    }

    #[test]
    fn update_reprices_lines_at_current_catalog_rates() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let owner = customer();
        let created = fx
            .service
            .create_order(&owner, vec![req(a, 1)])
            .expect("create failed");
        assert_eq!(created.total_amount, dec("100000"));

        // Catalog price changes between creation and update.
        fx.catalog.0.lock().unwrap().get_mut(&a).unwrap().price = dec("150000");

        let updated = fx
            .service
            .update_order(&owner, created.id, vec![req(a, 1)])
            .expect("update failed");
        assert_eq!(updated.lines[0].unit_price, dec("150000"));
        assert_eq!(updated.total_amount, dec("150000"));
    }

    #[test]
    fn update_unknown_order_is_not_found() {
        let fx = fixture();
        let a = fx.catalog.put("1.00");
        let err = fx
            .service
            .update_order(&customer(), Uuid::new_v4(), vec![req(a, 1)])
            .unwrap_err();
        assert!(matches!(err, DomainError::OrderNotFound(_)));
    }

    #[test]
    fn update_on_completed_order_is_rejected_and_leaves_state_unchanged() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let owner = customer();
        let created = fx
            .service
            .create_order(&owner, vec![req(a, 2)])
            .expect("create failed");
        fx.service.pay_order(&owner, created.id).expect("pay failed");

        let err = fx
            .service
            .update_order(&owner, created.id, vec![req(a, 5)])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        let stored = fx.orders.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(stored.total_amount, dec("200000"));
        assert_eq!(stored.lines.len(), 1);
        assert_eq!(stored.lines[0].quantity, 2);
    }

    #[test]
    fn pay_completes_pending_order_for_owner() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let owner = customer();
        let created = fx
            .service
            .create_order(&owner, vec![req(a, 1)])
            .expect("create failed");

        let paid = fx.service.pay_order(&owner, created.id).expect("pay failed");
        assert_eq!(paid.status, OrderStatus::Completed);
        assert_eq!(paid.lines.len(), 1);
    }

    #[test]
    fn pay_by_non_owner_is_forbidden_and_status_unchanged() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let owner = customer();
        let created = fx
            .service
            .create_order(&owner, vec![req(a, 1)])
            .expect("create failed");

        let err = fx.service.pay_order(&customer(), created.id).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let stored = fx.orders.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[test]
    fn second_pay_is_an_invalid_state() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let owner = customer();
        let created = fx
            .service
            .create_order(&owner, vec![req(a, 1)])
            .expect("create failed");

        fx.service.pay_order(&owner, created.id).expect("pay failed");
        let err = fx.service.pay_order(&owner, created.id).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn pay_unknown_order_is_not_found() {
        let fx = fixture();
        let err = fx.service.pay_order(&customer(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::OrderNotFound(_)));
    }

    #[test]
    fn cancel_sets_cancelled_regardless_of_current_status() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let owner = customer();
        let created = fx
            .service
            .create_order(&owner, vec![req(a, 1)])
            .expect("create failed");
        fx.service.pay_order(&owner, created.id).expect("pay failed");

        // Cancelling a COMPLETED order succeeds; no guard is applied.
        let cancelled = fx
            .service
            .cancel_order(&owner, created.id)
            .expect("cancel failed");
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.lines.len(), 1, "cancel keeps the lines");
    }

    #[test]
    fn cancel_unknown_order_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .cancel_order(&customer(), Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, DomainError::OrderNotFound(_)));
    }

    #[test]
    fn get_order_is_allowed_for_owner_and_admin_only() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let owner = customer();
        let created = fx
            .service
            .create_order(&owner, vec![req(a, 1)])
            .expect("create failed");

        assert!(fx.service.get_order(&owner, created.id).is_ok());
        assert!(fx.service.get_order(&admin(), created.id).is_ok());

        let err = fx.service.get_order(&customer(), created.id).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn get_unknown_order_is_not_found_even_for_admin() {
        let fx = fixture();
        let err = fx.service.get_order(&admin(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::OrderNotFound(_)));
    }

    #[test]
    fn list_all_requires_admin_role() {
        let fx = fixture();
        let err = fx.service.list_all_orders(&customer()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert!(fx.service.list_all_orders(&admin()).unwrap().is_empty());
    }

    #[test]
    fn list_for_caller_returns_only_their_orders() {
        let fx = fixture();
        let a = fx.catalog.put("100000");
        let alice = customer();
        let bob = customer();
        fx.service
            .create_order(&alice, vec![req(a, 1)])
            .expect("create failed");
        fx.service
            .create_order(&bob, vec![req(a, 2)])
            .expect("create failed");

        let mine = fx.service.list_orders_for_caller(&alice).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].owner_id, alice.id);

        let all = fx.service.list_all_orders(&admin()).unwrap();
        assert_eq!(all.len(), 2);
    }
}
