/*
 * Responsibility
 * - user and role management handlers (administrator routes)
 * - the admin gate has already run; handlers only pass through to UserService
 * - collaborator not-found is returned verbatim as 404
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::users::{AssignRoleRequest, ResetPasswordRequest},
        extractors::{JsonBody, UserIdPath},
    },
    error::AppError,
    services::users::{Role, User},
    state::AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.users.list_users().await?;
    Ok(Json(users))
}

pub async fn delete_user(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> Result<StatusCode, AppError> {
    state.users.delete_user(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, AppError> {
    let roles = state.users.list_roles().await?;
    Ok(Json(roles))
}

pub async fn assign_role(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    JsonBody(req): JsonBody<AssignRoleRequest>,
) -> Result<Json<User>, AppError> {
    req.validate().map_err(AppError::rejected_input)?;

    let user = state
        .users
        .assign_role(&user_id, &req.role_id)
        .await?;

    Ok(Json(user))
}

pub async fn reset_password(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> Result<Json<User>, AppError> {
    req.validate().map_err(AppError::rejected_input)?;

    let user = state
        .users
        .reset_password(&user_id, &req.new_password)
        .await?;

    Ok(Json(user))
}
