/*
 * Responsibility
 * - POST /register, POST /login (public)
 * - DTO validation → UserService call; no identity involved
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
        extractors::JsonBody,
    },
    error::AppError,
    services::users::User,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    req.validate().map_err(AppError::rejected_input)?;

    let user = state.users.register(req.into()).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate().map_err(AppError::rejected_input)?;

    let token = state.users.login(req.into()).await?;

    Ok(Json(LoginResponse { token }))
}
