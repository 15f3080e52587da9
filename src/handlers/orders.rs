use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{OrderLineRequest, OrderLineView, OrderView};
use crate::errors::AppError;
use crate::AppOrderService;

use super::identity::CallerIdentity;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequestDto {
    pub product_id: Uuid,
    /// Number of units; must be positive.
    pub quantity: i32,
}

/// A cart submission. Prices are intentionally absent: the server snapshots
/// them from the catalog.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderRequestDto {
    pub lines: Vec<OrderLineRequestDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    /// Decimal total as a string, derived server-side from the lines.
    pub total_amount: String,
    /// RFC 3339 creation timestamp.
    pub order_date: String,
    pub status: String,
    pub owner_id: Uuid,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(l: OrderLineView) -> Self {
        Self {
            id: l.id,
            order_id: l.order_id,
            product_id: l.product_id,
            quantity: l.quantity,
            unit_price: l.unit_price.to_string(),
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            total_amount: o.total_amount.to_string(),
            order_date: o.order_date.to_rfc3339(),
            status: o.status.to_string(),
            owner_id: o.owner_id,
            lines: o.lines.into_iter().map(Into::into).collect(),
        }
    }
}

fn to_domain(lines: Vec<OrderLineRequestDto>) -> Vec<OrderLineRequest> {
    lines
        .into_iter()
        .map(|l| OrderLineRequest {
            product_id: l.product_id,
            quantity: l.quantity,
        })
        .collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates a PENDING order owned by the caller. Unit prices are snapshotted
/// from the catalog and the total is computed server-side; the order and its
/// lines are committed as one unit of work.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderRequestDto,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Empty cart or non-positive quantity"),
        (status = 403, description = "Missing caller identity"),
        (status = 404, description = "A referenced orchid does not exist"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    svc: web::Data<AppOrderService>,
    caller: CallerIdentity,
    body: web::Json<OrderRequestDto>,
) -> Result<HttpResponse, AppError> {
    let caller = caller.0;
    let lines = to_domain(body.into_inner().lines);

    let view = web::block(move || svc.create_order(&caller, lines))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(view)))
}

/// GET /orders/{id}
///
/// Returns the order with its lines. Owner or ADMIN only.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Caller is neither owner nor ADMIN"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    svc: web::Data<AppOrderService>,
    caller: CallerIdentity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let caller = caller.0;
    let order_id = path.into_inner();

    let view = web::block(move || svc.get_order(&caller, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// PATCH /orders/{id}
///
/// Replaces the full line set of a PENDING order and recomputes its total.
/// The new lines are priced at the catalog's current rates.
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = OrderRequestDto,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Empty cart or non-positive quantity"),
        (status = 404, description = "Order or referenced orchid not found"),
        (status = 409, description = "Order is not in PENDING status"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    svc: web::Data<AppOrderService>,
    caller: CallerIdentity,
    path: web::Path<Uuid>,
    body: web::Json<OrderRequestDto>,
) -> Result<HttpResponse, AppError> {
    let caller = caller.0;
    let order_id = path.into_inner();
    let lines = to_domain(body.into_inner().lines);

    let view = web::block(move || svc.update_order(&caller, order_id, lines))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// POST /orders/pay/{id}
///
/// Transitions a PENDING order to COMPLETED. Owner only.
#[utoipa::path(
    post,
    path = "/orders/pay/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order completed", body = OrderResponse),
        (status = 403, description = "Caller does not own the order"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not in PENDING status"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn pay_order(
    svc: web::Data<AppOrderService>,
    caller: CallerIdentity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let caller = caller.0;
    let order_id = path.into_inner();

    let view = web::block(move || svc.pay_order(&caller, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// DELETE /orders/{id}
///
/// Soft delete: marks the order CANCELLED whatever its current status and
/// keeps its lines.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    svc: web::Data<AppOrderService>,
    caller: CallerIdentity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let caller = caller.0;
    let order_id = path.into_inner();

    let view = web::block(move || svc.cancel_order(&caller, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// GET /orders
///
/// Returns every order joined with its lines. ADMIN only.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = [OrderResponse]),
        (status = 403, description = "Caller lacks the ADMIN role"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_all_orders(
    svc: web::Data<AppOrderService>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let caller = caller.0;

    let views = web::block(move || svc.list_all_orders(&caller))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<OrderResponse> = views.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /orders/user
///
/// Returns the caller's own orders joined with their lines.
#[utoipa::path(
    get,
    path = "/orders/user",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 403, description = "Missing caller identity"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_my_orders(
    svc: web::Data<AppOrderService>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let caller = caller.0;

    let views = web::block(move || svc.list_orders_for_caller(&caller))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<OrderResponse> = views.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(items))
}
