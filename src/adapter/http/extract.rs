// src/adapter/http/extract.rs
// Caller identity extractor
//
// Authentication itself is out of scope; an upstream gateway terminates
// the session and forwards the verified identity in headers. This
// extractor is the seam where that identity enters the service.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use super::error::ApiError;
use crate::domain::errors::MarketError;
use crate::domain::model::{Actor, Role};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn parse_role(value: &str) -> Option<Role> {
    match value {
        "customer" => Some(Role::Customer),
        "vendor" => Some(Role::Vendor),
        "admin" => Some(Role::Admin),
        _ => None,
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or(ApiError(MarketError::Unauthenticated))?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_role)
            .ok_or(ApiError(MarketError::Unauthenticated))?;

        Ok(Actor { user_id, role })
    }
}
