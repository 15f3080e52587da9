use thiserror::Error;
use uuid::Uuid;

/// Failure kinds surfaced by the order lifecycle operations. All of them are
/// terminal for the request; nothing here is retried.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found with ID: {0}")]
    OrderNotFound(Uuid),

    #[error("Orchid not found with ID: {0}")]
    ProductNotFound(Uuid),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
