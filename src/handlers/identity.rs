use std::collections::HashSet;
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::identity::Identity;
use crate::errors::AppError;

pub const ACCOUNT_ID_HEADER: &str = "x-account-id";
pub const ROLES_HEADER: &str = "x-account-roles";

/// Caller identity as forwarded by the upstream authentication gateway.
/// Token validation happens there; this service only consumes the result.
/// Requests arriving without a resolvable identity are rejected as 403.
#[derive(Debug)]
pub struct CallerIdentity(pub Identity);

impl FromRequest for CallerIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<CallerIdentity, AppError> {
    let raw_id = req
        .headers()
        .get(ACCOUNT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Forbidden("Missing authenticated account".to_string()))?;

    let id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::Forbidden("Malformed account id".to_string()))?;

    let roles: HashSet<String> = req
        .headers()
        .get(ROLES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(CallerIdentity(Identity { id, roles }))
}
