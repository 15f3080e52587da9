use std::collections::HashSet;

use uuid::Uuid;

use super::errors::DomainError;

/// Role claim that bypasses ownership checks on read and list operations.
pub const ADMIN_ROLE: &str = "ADMIN";

/// The authenticated caller, as supplied by the upstream identity layer.
/// Every operation takes it explicitly; nothing reads ambient security state.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub roles: HashSet<String>,
}

impl Identity {
    pub fn new(id: Uuid, roles: impl IntoIterator<Item = String>) -> Self {
        Self {
            id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Caller must hold `role`.
pub fn require_role(caller: &Identity, role: &str) -> Result<(), DomainError> {
    if caller.has_role(role) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!("{role} role required")))
    }
}

/// Caller must own the record, or hold `role`.
pub fn require_owner_or_role(
    caller: &Identity,
    owner_id: Uuid,
    role: &str,
) -> Result<(), DomainError> {
    if caller.id == owner_id || caller.has_role(role) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "You are not authorized to access this order".to_string(),
        ))
    }
}
