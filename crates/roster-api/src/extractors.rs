//! Axum extractors for API handlers

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use roster_core::pagination::PageRequest;
use roster_core::traits::Id;
use roster_services::UserService;
use serde_json::Value;

use crate::error::ApiError;

pub const NUMERIC_ID_EXPECTED: &str = "Validation failed (numeric string is expected)";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

impl AppState {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

/// Integer `:id` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Id);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request(NUMERIC_ID_EXPECTED))?;

        parse_id(&raw)
            .map(UserId)
            .ok_or_else(|| ApiError::bad_request(NUMERIC_ID_EXPECTED))
    }
}

/// Digits with an optional leading `-`; no sign `+`, no whitespace
fn parse_id(raw: &str) -> Option<Id> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Raw JSON body, left untyped for the payload contracts
///
/// Malformed JSON is a 400 rather than axum's default 422.
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// `?page=&limit=` query
pub struct PageQuery(pub PageRequest);

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(page) = Query::<PageRequest>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(PageQuery(page))
    }
}
