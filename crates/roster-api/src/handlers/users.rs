//! Users API handlers

use axum::{extract::State, http::StatusCode, Json};
use roster_contracts::users::{CreateUserContract, UpdateUserContract};
use roster_contracts::Contract;
use roster_models::{UserSummary, UserWithRoles};
use roster_services::{CreateUserResult, SuccessResult};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, JsonBody, PageQuery, UserId};

/// List users
///
/// GET /users?page=&limit=
pub async fn list_users(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = state.users.list(page).await?;
    Ok(Json(users))
}

/// Get a single user with roles
///
/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<Json<UserWithRoles>> {
    let user = state.users.get(id).await?;
    Ok(Json(user))
}

/// Create a user
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<CreateUserResult>)> {
    let new_user = CreateUserContract
        .validate(&body)
        .map_err(ApiError::InvalidPayload)?;

    let result = state.users.create(new_user).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Update a user
///
/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<SuccessResult>> {
    let update = UpdateUserContract
        .validate(&body)
        .map_err(ApiError::InvalidPayload)?;

    let result = state.users.update(id, update).await?;
    Ok(Json(result))
}

/// Delete a user
///
/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<Json<SuccessResult>> {
    let result = state.users.delete(id).await?;
    Ok(Json(result))
}
