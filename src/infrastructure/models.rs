use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::{orchids, order_lines, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orchids)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrchidRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_natural: bool,
    pub is_available: bool,
    pub price: BigDecimal,
}

/// Insertable counterpart of [`OrchidRow`]; catalog rows are written by the
/// catalog service in production and by test fixtures here.
#[derive(Debug, Insertable)]
#[diesel(table_name = orchids)]
pub struct NewOrchidRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_natural: bool,
    pub is_available: bool,
    pub price: BigDecimal,
}
