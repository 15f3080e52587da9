use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CatalogGateway, Product};
use crate::schema::orchids;

use super::models::OrchidRow;

/// Catalog gateway backed by the shared `orchids` table. Strictly read-only:
/// catalog maintenance lives in another service.
pub struct DieselCatalogGateway {
    pool: DbPool,
}

impl DieselCatalogGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogGateway for DieselCatalogGateway {
    fn resolve_product(&self, product_id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let orchid = orchids::table
            .filter(orchids::id.eq(product_id))
            .select(OrchidRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(orchid.map(|o| Product {
            id: o.id,
            price: o.price,
        }))
    }
}
